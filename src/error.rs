use std::io;

use thiserror::Error;

/// Problems with bus parameters or bundle shapes, reported once when a model is built
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
  #[error("{field} must be in {min}..={max}, got {value}")]
  OutOfRange {
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
  },

  #[error("data_bits must be a multiple of 8, got {0}")]
  UnalignedDataBits(usize),

  #[error("bundle has {found} {what}, bus is configured for {expected}")]
  ShapeMismatch {
    what: &'static str,
    expected: usize,
    found: usize,
  },

  #[error("phase {phase} {field} {value:#x} does not fit in {bits} bits")]
  FieldOverflow {
    phase: usize,
    field: &'static str,
    value: u128,
    bits: usize,
  },

  #[error("read_latency must be at least 1 cycle")]
  ZeroReadLatency,
}

/// Software-side register access failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CsrError {
  #[error("unknown register '{0}'")]
  UnknownRegister(String),

  #[error("register '{0}' is read-only")]
  ReadOnly(String),

  #[error("register '{0}' is write-only")]
  WriteOnly(String),

  #[error("phase {phase} out of range, injector has {nphases} phases")]
  PhaseOutOfRange { phase: usize, nphases: usize },

  #[error("invalid value '{0}'")]
  InvalidValue(String),
}

#[derive(Debug, Error)]
pub enum SimError {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error("failed to parse TOML config: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("failed to write trace: {0}")]
  Trace(#[from] serde_json::Error),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Csr(#[from] CsrError),

  #[error("line editor: {0}")]
  Readline(#[from] rustyline::error::ReadlineError),

  #[error("{0}")]
  Command(String),

  #[error("{path}:{line}: {source}")]
  Script {
    path: String,
    line: usize,
    #[source]
    source: Box<SimError>,
  },
}

pub type SimResult<T> = Result<T, SimError>;
