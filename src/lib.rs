//! Cycle model of a DFI command injector.
//!
//! A [`DfiInjector`] sits between an automatic memory controller and the
//! PHY. Software either lets the controller drive the bus or takes over and
//! issues raw DRAM commands phase by phase through [`PhaseInjector`]
//! registers, as done during memory initialization and calibration.
pub mod builtin;
pub mod controller;
pub mod csr;
pub mod dfi;
pub mod error;
pub mod injector;
pub mod phy;
pub mod simulator;
pub mod top;

pub use dfi::{DfiBundle, DfiParams, DramCommand, PhaseIn, PhaseOut, Sideband, SidebandCaps};
pub use error::{ConfigError, CsrError, SimError, SimResult};
pub use injector::{CommandOpcode, ControlFlags, DfiInjector, PhaseInjector};
pub use simulator::sim::{SimConfig, StepMode};
pub use simulator::Simulator;
