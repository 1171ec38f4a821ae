//! DFI bus shape and signal bundles
pub mod bundle;
pub mod command;
pub mod params;

pub use bundle::{DfiBundle, PhaseIn, PhaseOut, Sideband};
pub use command::DramCommand;
pub use params::{DfiParams, SidebandCaps};
