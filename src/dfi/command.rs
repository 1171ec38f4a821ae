use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CsrError;
use crate::injector::CommandOpcode;

/// Standard DRAM commands, as encoded by the chip-select, RAS, CAS and WE strobes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DramCommand {
  /// Chip-select de-asserted
  Deselect,
  Nop,
  Activate,
  Read,
  Write,
  Precharge,
  Refresh,
  ModeRegister,
  ZqCalibration,
}

impl DramCommand {
  /// Classify asserted strobes (true = asserted, independent of bus polarity)
  pub fn from_strobes(cs: bool, ras: bool, cas: bool, we: bool) -> Self {
    if !cs {
      return Self::Deselect;
    }
    match (ras, cas, we) {
      (false, false, false) => Self::Nop,
      (true, false, false) => Self::Activate,
      (false, true, false) => Self::Read,
      (false, true, true) => Self::Write,
      (true, false, true) => Self::Precharge,
      (true, true, false) => Self::Refresh,
      (true, true, true) => Self::ModeRegister,
      (false, false, true) => Self::ZqCalibration,
    }
  }

  /// Opcode a driver writes to a phase's command register to issue this command
  pub fn opcode(self) -> CommandOpcode {
    use CommandOpcode as Op;
    match self {
      Self::Deselect => Op::empty(),
      Self::Nop => Op::CS,
      Self::Activate => Op::CS | Op::RAS,
      Self::Read => Op::CS | Op::CAS | Op::RDDATA,
      Self::Write => Op::CS | Op::CAS | Op::WE | Op::WRDATA,
      Self::Precharge => Op::CS | Op::RAS | Op::WE,
      Self::Refresh => Op::CS | Op::RAS | Op::CAS,
      Self::ModeRegister => Op::CS | Op::RAS | Op::CAS | Op::WE,
      Self::ZqCalibration => Op::CS | Op::WE,
    }
  }

  pub fn mnemonic(self) -> &'static str {
    match self {
      Self::Deselect => "des",
      Self::Nop => "nop",
      Self::Activate => "act",
      Self::Read => "rd",
      Self::Write => "wr",
      Self::Precharge => "pre",
      Self::Refresh => "ref",
      Self::ModeRegister => "mrs",
      Self::ZqCalibration => "zqcl",
    }
  }
}

impl fmt::Display for DramCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.mnemonic())
  }
}

impl FromStr for DramCommand {
  type Err = CsrError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "des" => Ok(Self::Deselect),
      "nop" => Ok(Self::Nop),
      "act" => Ok(Self::Activate),
      "rd" => Ok(Self::Read),
      "wr" => Ok(Self::Write),
      "pre" => Ok(Self::Precharge),
      "ref" => Ok(Self::Refresh),
      "mrs" => Ok(Self::ModeRegister),
      "zqcl" => Ok(Self::ZqCalibration),
      _ => Err(CsrError::InvalidValue(s.to_string())),
    }
  }
}
