use serde::Serialize;

use super::{DfiParams, DramCommand};
use crate::builtin::Wire;
use crate::csr::width_mask;
use crate::error::ConfigError;

/// Outgoing command path of one phase.
///
/// Levels are as they appear on the bus: `cs_n`, `we_n`, `cas_n` and `ras_n`
/// are active-low, so `true` means de-asserted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PhaseOut {
  /// One chip-select line per rank
  pub cs_n: Vec<bool>,
  pub we_n: bool,
  pub cas_n: bool,
  pub ras_n: bool,
  pub address: u32,
  pub bank: u8,
  pub wrdata: u128,
  /// One line per data byte, set = byte masked
  pub wrdata_mask: u16,
  pub wrdata_en: bool,
  pub rddata_en: bool,
}

impl PhaseOut {
  /// No command: every strobe de-asserted, data enables low
  pub fn idle(params: &DfiParams) -> Self {
    Self {
      cs_n: vec![true; params.nranks],
      we_n: true,
      cas_n: true,
      ras_n: true,
      address: 0,
      bank: 0,
      wrdata: 0,
      wrdata_mask: 0,
      wrdata_en: false,
      rddata_en: false,
    }
  }

  /// Any chip-select line asserted
  pub fn selected(&self) -> bool {
    self.cs_n.iter().any(|cs_n| !cs_n)
  }

  /// Classify the strobe levels as a DRAM command
  pub fn command(&self) -> DramCommand {
    DramCommand::from_strobes(self.selected(), !self.ras_n, !self.cas_n, !self.we_n)
  }
}

/// Inbound read data of one phase, qualified by `rddata_valid`
pub type PhaseIn = Wire<u128>;

/// Rank sideband lines of one phase.
///
/// `odt` and `reset_n` are `None` on bus variants that do not declare them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sideband {
  pub cke: Vec<bool>,
  pub odt: Option<Vec<bool>>,
  pub reset_n: Option<bool>,
}

impl Sideband {
  /// Drive each declared line to the given level on every rank
  pub fn new(params: &DfiParams, cke: bool, odt: bool, reset_n: bool) -> Self {
    Self {
      cke: vec![cke; params.nranks],
      odt: params.sideband.odt.then(|| vec![odt; params.nranks]),
      reset_n: params.sideband.reset_n.then_some(reset_n),
    }
  }
}

/// The per-phase command path of a whole DFI port
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DfiBundle {
  pub phases: Vec<PhaseOut>,
}

impl DfiBundle {
  pub fn idle(params: &DfiParams) -> Self {
    Self {
      phases: (0..params.nphases).map(|_| PhaseOut::idle(params)).collect(),
    }
  }

  /// Check that an externally built bundle matches the configured bus
  pub fn check_shape(&self, params: &DfiParams) -> Result<(), ConfigError> {
    if self.phases.len() != params.nphases {
      return Err(ConfigError::ShapeMismatch {
        what: "phases",
        expected: params.nphases,
        found: self.phases.len(),
      });
    }
    for (n, phase) in self.phases.iter().enumerate() {
      if phase.cs_n.len() != params.nranks {
        return Err(ConfigError::ShapeMismatch {
          what: "chip-select lines",
          expected: params.nranks,
          found: phase.cs_n.len(),
        });
      }
      let fields = [
        ("address", u128::from(phase.address), params.address_bits),
        ("bank", u128::from(phase.bank), params.bank_bits),
        ("wrdata", phase.wrdata, params.data_bits),
        ("wrdata_mask", u128::from(phase.wrdata_mask), params.mask_bits()),
      ];
      for (field, value, bits) in fields {
        if value & !width_mask(bits) != 0 {
          return Err(ConfigError::FieldOverflow { phase: n, field, value, bits });
        }
      }
    }
    Ok(())
  }
}
