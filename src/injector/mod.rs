//! Software command injection and manual/automatic arbitration
mod dfi_injector;
mod opcode;
mod phase_injector;

pub use dfi_injector::DfiInjector;
pub use opcode::{CommandOpcode, ControlFlags};
pub use phase_injector::PhaseInjector;
