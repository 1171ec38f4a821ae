//! Software-visible register primitives and the injector's register names
pub mod map;
pub mod storage;

pub use map::{parse_value, CsrAccess, CsrInfo, Persistence, PhaseReg, RegName};
pub use storage::{width_mask, CsrStatus, CsrStorage, CsrStrobe};
