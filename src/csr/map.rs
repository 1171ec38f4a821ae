use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CsrError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CsrAccess {
  ReadWrite,
  ReadOnly,
  WriteOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
  /// Held until overwritten, cleared by system reset
  Persistent,
  /// Held until overwritten, system reset leaves it alone
  SurvivesReset,
  /// Pulses for one cycle per write
  Strobe,
  /// Updated by hardware
  Status,
}

/// One entry of the register map
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CsrInfo {
  pub name: String,
  pub width: usize,
  pub access: CsrAccess,
  pub persistence: Persistence,
}

impl fmt::Display for CsrInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let access = match self.access {
      CsrAccess::ReadWrite => "rw",
      CsrAccess::ReadOnly => "r",
      CsrAccess::WriteOnly => "w",
    };
    let persistence = match self.persistence {
      Persistence::Persistent => "",
      Persistence::SurvivesReset => " (survives reset)",
      Persistence::Strobe => " (strobe)",
      Persistence::Status => " (status)",
    };
    write!(f, "{:<20} {:>3} bits  {:<2}{}", self.name, self.width, access, persistence)
  }
}

/// Registers every phase injector exposes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseReg {
  Command,
  CommandIssue,
  Address,
  Baddress,
  Wrdata,
  Rddata,
}

impl PhaseReg {
  pub const ALL: [PhaseReg; 6] = [
    PhaseReg::Command,
    PhaseReg::CommandIssue,
    PhaseReg::Address,
    PhaseReg::Baddress,
    PhaseReg::Wrdata,
    PhaseReg::Rddata,
  ];

  pub fn suffix(self) -> &'static str {
    match self {
      PhaseReg::Command => "command",
      PhaseReg::CommandIssue => "command_issue",
      PhaseReg::Address => "address",
      PhaseReg::Baddress => "baddress",
      PhaseReg::Wrdata => "wrdata",
      PhaseReg::Rddata => "rddata",
    }
  }

  fn from_suffix(suffix: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|reg| reg.suffix() == suffix)
  }
}

/// A register name, `control` or `pi<N>_<register>`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegName {
  Control,
  Phase(usize, PhaseReg),
}

impl FromStr for RegName {
  type Err = CsrError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let unknown = || CsrError::UnknownRegister(s.to_string());
    let name = s.trim().to_lowercase();
    if name == "control" {
      return Ok(RegName::Control);
    }
    let rest = name.strip_prefix("pi").ok_or_else(unknown)?;
    let (index, suffix) = rest.split_once('_').ok_or_else(unknown)?;
    let phase = index.parse::<usize>().map_err(|_| unknown())?;
    let reg = PhaseReg::from_suffix(suffix).ok_or_else(unknown)?;
    Ok(RegName::Phase(phase, reg))
  }
}

impl fmt::Display for RegName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegName::Control => f.write_str("control"),
      RegName::Phase(phase, reg) => write!(f, "pi{}_{}", phase, reg.suffix()),
    }
  }
}

/// Parse a register value, `0x`/`0b` prefixed or decimal
pub fn parse_value(s: &str) -> Result<u128, CsrError> {
  let cleaned = s.trim().replace('_', "");
  let parsed = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
    u128::from_str_radix(hex, 16)
  } else if let Some(bin) = cleaned.strip_prefix("0b") {
    u128::from_str_radix(bin, 2)
  } else {
    cleaned.parse::<u128>()
  };
  parsed.map_err(|_| CsrError::InvalidValue(s.to_string()))
}
