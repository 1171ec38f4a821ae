//! Register-level command language shared by scripts and the step shell
use std::str::FromStr;

use crate::csr::parse_value;
use crate::dfi::DramCommand;
use crate::error::{SimError, SimResult};
use crate::injector::ControlFlags;

pub const HELP: &str = "\
  w <reg> <value>          write a register
  r <reg>                  read a register
  cmd p<N> <command>       issue mrs|ref|pre|act|wr|rd|zqcl|nop on phase N
                           and step one cycle
  ctl [sel] [cke] [odt] [reset_n]
                           write the control register
  si [N]                   step N cycles (Enter steps once)
  regs                     list registers
  reset                    system reset
  q                        quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Write { reg: String, value: u128 },
  Read { reg: String },
  Issue { phase: usize, command: DramCommand },
  Control(ControlFlags),
  Step(u32),
  Regs,
  Reset,
  Quit,
}

impl Command {
  /// Parse one line. Blank lines and `#` comments give `None`.
  pub fn parse(line: &str) -> SimResult<Option<Command>> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
      return Ok(None);
    }
    line.parse().map(Some)
  }
}

impl FromStr for Command {
  type Err = SimError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut words = s.split_whitespace();
    let keyword = words.next().unwrap_or("");
    let args: Vec<&str> = words.collect();

    let command = match (keyword, args.as_slice()) {
      ("w" | "write", [reg, value]) => Command::Write {
        reg: reg.to_string(),
        value: parse_value(value)?,
      },
      ("r" | "read", [reg]) => Command::Read { reg: reg.to_string() },
      ("cmd", [phase, command]) => Command::Issue {
        phase: parse_phase(phase)?,
        command: command.parse()?,
      },
      ("ctl", flags) => Command::Control(parse_control(flags)?),
      ("si", []) => Command::Step(1),
      ("si", [count]) => match count.parse::<u32>() {
        Ok(n) if n > 0 => Command::Step(n),
        _ => return Err(SimError::Command(format!("invalid step count '{}'", count))),
      },
      ("regs", []) => Command::Regs,
      ("reset", []) => Command::Reset,
      ("q" | "quit", []) => Command::Quit,
      _ => return Err(SimError::Command(format!("unknown command '{}'", s))),
    };
    Ok(command)
  }
}

fn parse_phase(word: &str) -> SimResult<usize> {
  let digits = word.strip_prefix('p').unwrap_or(word);
  digits
    .parse()
    .map_err(|_| SimError::Command(format!("invalid phase '{}'", word)))
}

fn parse_control(flags: &[&str]) -> SimResult<ControlFlags> {
  flags.iter().try_fold(ControlFlags::empty(), |acc, flag| {
    let bit = match flag.to_lowercase().as_str() {
      "sel" => ControlFlags::SEL,
      "cke" => ControlFlags::CKE,
      "odt" => ControlFlags::ODT,
      "reset_n" => ControlFlags::RESET_N,
      other => return Err(SimError::Command(format!("unknown control flag '{}'", other))),
    };
    Ok(acc | bit)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(line: &str) -> Command {
    Command::parse(line).unwrap().unwrap()
  }

  #[test]
  fn blank_and_comment_lines_are_skipped() {
    assert_eq!(Command::parse("").unwrap(), None);
    assert_eq!(Command::parse("   # release reset").unwrap(), None);
  }

  #[test]
  fn parses_register_access() {
    assert_eq!(
      parse("w pi0_address 0x408 # MR2"),
      Command::Write {
        reg: "pi0_address".to_string(),
        value: 0x408
      }
    );
    assert_eq!(parse("r pi1_rddata"), Command::Read { reg: "pi1_rddata".to_string() });
  }

  #[test]
  fn parses_issue_and_control() {
    assert_eq!(
      parse("cmd p2 mrs"),
      Command::Issue {
        phase: 2,
        command: DramCommand::ModeRegister
      }
    );
    assert_eq!(parse("ctl cke odt reset_n"), Command::Control(ControlFlags::from_bits_truncate(0x0e)));
    assert_eq!(parse("ctl"), Command::Control(ControlFlags::empty()));
  }

  #[test]
  fn parses_stepping() {
    assert_eq!(parse("si"), Command::Step(1));
    assert_eq!(parse("si 100"), Command::Step(100));
    assert!(Command::parse("si 0").is_err());
    assert!(Command::parse("si x").is_err());
  }

  #[test]
  fn rejects_malformed_lines() {
    for line in ["w pi0_address", "cmd px mrs", "cmd p0 burst", "ctl sel bogus", "jump 3", "w pi0_address zz"] {
      assert!(Command::parse(line).is_err(), "{line}");
    }
  }
}
