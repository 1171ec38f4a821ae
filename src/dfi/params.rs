use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Optional rank sideband lines a bus variant declares.
///
/// A bus without termination or reset lines is a valid variant; the
/// injector consults these tags instead of probing the bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SidebandCaps {
  pub odt: bool,
  pub reset_n: bool,
}

impl SidebandCaps {
  pub const NONE: Self = Self {
    odt: false,
    reset_n: false,
  };
  pub const FULL: Self = Self {
    odt: true,
    reset_n: true,
  };
}

impl Default for SidebandCaps {
  fn default() -> Self {
    Self::FULL
  }
}

/// Bus parameters, fixed when the model is built
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DfiParams {
  pub address_bits: usize,
  pub bank_bits: usize,
  pub nranks: usize,
  pub data_bits: usize,
  pub nphases: usize,
  pub sideband: SidebandCaps,
}

const ADDRESS_BITS_MAX: usize = 32;
const BANK_BITS_MAX: usize = 8;
const NRANKS_MAX: usize = 16;
const DATA_BITS_MAX: usize = 128;
const NPHASES_MAX: usize = 8;

impl DfiParams {
  /// Validated parameters for a bus with every sideband line present
  pub fn new(
    address_bits: usize,
    bank_bits: usize,
    nranks: usize,
    data_bits: usize,
    nphases: usize,
  ) -> Result<Self, ConfigError> {
    let params = Self {
      address_bits,
      bank_bits,
      nranks,
      data_bits,
      nphases,
      sideband: SidebandCaps::FULL,
    };
    params.validate()?;
    Ok(params)
  }

  pub fn with_sideband(mut self, sideband: SidebandCaps) -> Self {
    self.sideband = sideband;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    check_range("address_bits", self.address_bits, 1, ADDRESS_BITS_MAX)?;
    check_range("bank_bits", self.bank_bits, 1, BANK_BITS_MAX)?;
    check_range("nranks", self.nranks, 1, NRANKS_MAX)?;
    check_range("data_bits", self.data_bits, 8, DATA_BITS_MAX)?;
    check_range("nphases", self.nphases, 1, NPHASES_MAX)?;
    if self.data_bits % 8 != 0 {
      return Err(ConfigError::UnalignedDataBits(self.data_bits));
    }
    Ok(())
  }

  /// Width of the write-data mask, one line per data byte
  pub fn mask_bits(&self) -> usize {
    self.data_bits / 8
  }
}

fn check_range(field: &'static str, value: usize, min: usize, max: usize) -> Result<(), ConfigError> {
  if (min..=max).contains(&value) {
    Ok(())
  } else {
    Err(ConfigError::OutOfRange { field, value, min, max })
  }
}
