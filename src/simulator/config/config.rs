use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dfi::{DfiParams, SidebandCaps};
use crate::error::{ConfigError, SimResult};

const DEFAULT_CONFIG: &str = include_str!("default.toml");

/// Bus shape
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BusSection {
  pub address_bits: usize,
  pub bank_bits: usize,
  pub nranks: usize,
  pub data_bits: usize,
  #[serde(default = "default_nphases")]
  pub nphases: usize,
  #[serde(default = "default_true")]
  pub odt: bool,
  #[serde(default = "default_true")]
  pub reset_n: bool,
}

impl BusSection {
  pub fn params(&self) -> Result<DfiParams, ConfigError> {
    let params = DfiParams::new(self.address_bits, self.bank_bits, self.nranks, self.data_bits, self.nphases)?;
    Ok(params.with_sideband(SidebandCaps {
      odt: self.odt,
      reset_n: self.reset_n,
    }))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SimulationSection {
  #[serde(default)]
  pub quiet: bool,
  #[serde(default)]
  pub step_mode: bool,
  #[serde(default)]
  pub trace_file: String,
  #[serde(default = "default_read_latency")]
  pub read_latency: usize,
}

fn default_nphases() -> usize {
  1
}

fn default_true() -> bool {
  true
}

fn default_read_latency() -> usize {
  2
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
  pub bus: BusSection,
  pub simulation: SimulationSection,
}

/// Command-line values that take precedence over every config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
  pub quiet: bool,
  pub step: bool,
  pub trace_file: Option<String>,
  pub nphases: Option<usize>,
  pub nranks: Option<usize>,
}

/// Recursively overlay `overlay` onto `base`; tables merge, everything else replaces
pub fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
  for (key, value) in overlay {
    match (base.get_mut(&key), value) {
      (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
        merge_tables(base_table, overlay_table);
      }
      (_, value) => {
        base.insert(key, value);
      }
    }
  }
}

pub fn apply_cli_overrides(config: &mut AppConfig, overrides: &CliOverrides) {
  if overrides.quiet {
    config.simulation.quiet = true;
  }
  if overrides.step {
    config.simulation.step_mode = true;
  }
  if let Some(file) = &overrides.trace_file {
    config.simulation.trace_file = file.clone();
  }
  if let Some(nphases) = overrides.nphases {
    config.bus.nphases = nphases;
  }
  if let Some(nranks) = overrides.nranks {
    config.bus.nranks = nranks;
  }
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
  config.bus.params()?;
  if config.simulation.read_latency == 0 {
    return Err(ConfigError::ZeroReadLatency);
  }
  Ok(())
}

/// Load and merge configs
///
/// 1. start from the built-in defaults
/// 2. overlay the user file, if any; it may set only some keys
/// 3. apply command-line overrides
/// 4. validate
pub fn load_and_merge_configs(custom_config_path: Option<&Path>, overrides: &CliOverrides) -> SimResult<AppConfig> {
  let mut table: toml::Table = toml::from_str(DEFAULT_CONFIG)?;
  if let Some(path) = custom_config_path {
    let content = fs::read_to_string(path)?;
    merge_tables(&mut table, toml::from_str(&content)?);
  }

  let mut config = toml::Value::Table(table).try_into::<AppConfig>()?;
  apply_cli_overrides(&mut config, overrides);
  validate_config(&config)?;
  Ok(config)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::SimError;
  use std::io::Write;

  #[test]
  fn default_config_is_valid() {
    let config = load_and_merge_configs(None, &CliOverrides::default()).unwrap();
    assert_eq!(config.bus.address_bits, 14);
    assert_eq!(config.simulation.read_latency, 2);
    validate_config(&config).unwrap();
  }

  #[test]
  fn partial_file_overlays_defaults() {
    let mut file = tempfile();
    writeln!(file.1, "[bus]\ndata_bits = 64\nnphases = 4\n\n[simulation]\nread_latency = 5").unwrap();

    let config = load_and_merge_configs(Some(&file.0), &CliOverrides::default()).unwrap();
    assert_eq!(config.bus.data_bits, 64);
    assert_eq!(config.bus.nphases, 4);
    assert_eq!(config.bus.address_bits, 14);
    assert_eq!(config.simulation.read_latency, 5);

    let _ = fs::remove_file(&file.0);
  }

  #[test]
  fn cli_overrides_win() {
    let overrides = CliOverrides {
      quiet: true,
      step: true,
      trace_file: Some("trace.jsonl".to_string()),
      nphases: Some(2),
      nranks: Some(4),
    };
    let config = load_and_merge_configs(None, &overrides).unwrap();
    assert!(config.simulation.quiet && config.simulation.step_mode);
    assert_eq!(config.simulation.trace_file, "trace.jsonl");
    assert_eq!((config.bus.nphases, config.bus.nranks), (2, 4));
  }

  #[test]
  fn invalid_bus_is_rejected() {
    let overrides = CliOverrides {
      nphases: Some(0),
      ..CliOverrides::default()
    };
    let err = load_and_merge_configs(None, &overrides).unwrap_err();
    assert!(matches!(
      err,
      SimError::Config(ConfigError::OutOfRange { field: "nphases", .. })
    ));
  }

  #[test]
  fn sideband_flags_reach_params() {
    let mut config = load_and_merge_configs(None, &CliOverrides::default()).unwrap();
    config.bus.reset_n = false;
    let params = config.bus.params().unwrap();
    assert!(params.sideband.odt);
    assert!(!params.sideband.reset_n);
  }

  fn tempfile() -> (std::path::PathBuf, fs::File) {
    let path = std::env::temp_dir().join(format!("dfii-config-{}.toml", std::process::id()));
    let file = fs::File::create(&path).unwrap();
    (path, file)
  }
}
