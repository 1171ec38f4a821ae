use std::path::PathBuf;

use crate::dfi::DfiParams;
use crate::error::ConfigError;
use crate::simulator::config::AppConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
  Continuous,
  Step,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
  pub params: DfiParams,
  pub quiet: bool,
  pub step_mode: StepMode,
  pub trace_file: Option<PathBuf>,
  pub read_latency: usize,
}

impl SimConfig {
  pub fn new(params: DfiParams) -> Self {
    Self {
      params,
      quiet: false,
      step_mode: StepMode::Continuous,
      trace_file: None,
      read_latency: 2,
    }
  }

  pub fn from_app_config(config: &AppConfig) -> Result<Self, ConfigError> {
    let simulation = &config.simulation;
    if simulation.read_latency == 0 {
      return Err(ConfigError::ZeroReadLatency);
    }
    Ok(Self {
      params: config.bus.params()?,
      quiet: simulation.quiet,
      step_mode: if simulation.step_mode {
        StepMode::Step
      } else {
        StepMode::Continuous
      },
      trace_file: (!simulation.trace_file.is_empty()).then(|| PathBuf::from(&simulation.trace_file)),
      read_latency: simulation.read_latency,
    })
  }
}
