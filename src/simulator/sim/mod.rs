pub mod command;
pub mod mode;
pub mod shell;
pub mod trace;

pub use command::Command;
pub use mode::{SimConfig, StepMode};
pub use shell::Shell;
pub use trace::TraceWriter;
