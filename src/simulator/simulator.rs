use std::fs;
use std::path::Path;

use log::{debug, info};

use super::sim::{Command, Shell, SimConfig, StepMode, TraceWriter};
use super::utils::log::set_quiet;
use crate::builtin::Module;
use crate::error::{CsrError, SimError, SimResult};
use crate::top::Top;

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Continue(Option<String>),
  Quit,
}

/// Cycle driver around [`Top`]
pub struct Simulator {
  config: SimConfig,
  cycle: u64,
  top: Top,
  trace: Option<TraceWriter>,
}

impl Simulator {
  pub fn new(config: SimConfig) -> SimResult<Self> {
    let top = Top::new("top", config.params, config.read_latency)?;
    let trace = match &config.trace_file {
      Some(path) => {
        info!("Writing trace to {}", path.display());
        Some(TraceWriter::create(path)?)
      }
      None => None,
    };
    Ok(Self {
      config,
      cycle: 0,
      top,
      trace,
    })
  }

  pub fn cycle(&self) -> u64 {
    self.cycle
  }

  pub fn top(&self) -> &Top {
    &self.top
  }

  pub fn step(&mut self, cycles: u32) -> SimResult<()> {
    for _ in 0..cycles {
      self.top.run();
      if let Some(trace) = self.trace.as_mut() {
        trace.record(self.cycle, &self.top)?;
      }
      for (n, phase) in self.top.dfii.master.phases.iter().enumerate() {
        if phase.selected() {
          debug!("cycle {} p{}: {}", self.cycle, n, phase.command());
        }
      }
      self.cycle += 1;
    }
    Ok(())
  }

  pub fn execute(&mut self, command: Command) -> SimResult<Outcome> {
    let message = match command {
      Command::Write { reg, value } => {
        self.top.dfii.csr_write(&reg, value)?;
        None
      }
      Command::Read { reg } => {
        let value = self.top.dfii.csr_read(&reg)?;
        Some(format!("{} = {:#x}", reg, value))
      }
      Command::Issue { phase, command } => {
        let nphases = self.top.dfii.nphases();
        let pi = self
          .top
          .dfii
          .phase_mut(phase)
          .ok_or(CsrError::PhaseOutOfRange { phase, nphases })?;
        pi.write_command(command.opcode());
        pi.issue();
        self.step(1)?;
        None
      }
      Command::Control(flags) => {
        self.top.dfii.write_control(flags);
        None
      }
      Command::Step(cycles) => {
        self.step(cycles)?;
        None
      }
      Command::Regs => {
        let lines: Vec<String> = self.top.dfii.csr_map().iter().map(ToString::to_string).collect();
        Some(lines.join("\n"))
      }
      Command::Reset => {
        info!("System reset at cycle {}", self.cycle);
        self.top.reset();
        None
      }
      Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Continue(message))
  }

  /// Run every line of `text`; errors carry `origin` and the line number
  pub fn run_lines(&mut self, origin: &str, text: &str) -> SimResult<Outcome> {
    for (index, line) in text.lines().enumerate() {
      let with_line = |source: SimError| SimError::Script {
        path: origin.to_string(),
        line: index + 1,
        source: Box::new(source),
      };
      let Some(command) = Command::parse(line).map_err(with_line)? else {
        continue;
      };
      match self.execute(command).map_err(with_line)? {
        Outcome::Continue(Some(message)) => println!("{}", message),
        Outcome::Continue(None) => {}
        Outcome::Quit => return Ok(Outcome::Quit),
      }
    }
    Ok(Outcome::Continue(None))
  }

  pub fn run_script(&mut self, path: &Path) -> SimResult<Outcome> {
    info!("Running script {}", path.display());
    let text = fs::read_to_string(path)?;
    self.run_lines(&path.display().to_string(), &text)
  }

  /// Run an optional script, then the shell in step mode
  pub fn run(&mut self, script: Option<&Path>) -> SimResult<()> {
    set_quiet(self.config.quiet);
    info!(
      "DFI injector: {} phase(s), {} rank(s), {} address bits, {} bank bits, {} data bits",
      self.config.params.nphases,
      self.config.params.nranks,
      self.config.params.address_bits,
      self.config.params.bank_bits,
      self.config.params.data_bits
    );

    let mut outcome = Outcome::Continue(None);
    if let Some(path) = script {
      outcome = self.run_script(path)?;
    }
    if outcome != Outcome::Quit && self.config.step_mode == StepMode::Step {
      self.run_shell()?;
    }

    if let Some(trace) = self.trace.as_mut() {
      trace.flush()?;
    }
    info!("Stopped after {} cycles", self.cycle);
    Ok(())
  }

  fn run_shell(&mut self) -> SimResult<()> {
    println!("Step mode - Enter steps one cycle, 'help' lists commands, 'q' quits");
    let mut shell = Shell::new()?;
    loop {
      let command = shell.read_command()?;
      match self.execute(command) {
        Ok(Outcome::Quit) => return Ok(()),
        Ok(Outcome::Continue(Some(message))) => println!("{}", message),
        Ok(Outcome::Continue(None)) => {}
        Err(e) => eprintln!("Error: {}", e),
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dfi::{DfiParams, DramCommand};

  fn simulator() -> Simulator {
    Simulator::new(SimConfig::new(DfiParams::new(14, 3, 1, 32, 2).unwrap())).unwrap()
  }

  #[test]
  fn issue_steps_one_cycle() {
    let mut sim = simulator();
    sim.run_lines("test", "ctl sel cke\ncmd p1 act").unwrap();
    assert_eq!(sim.cycle(), 1);
    assert_eq!(sim.top().dfii.master.phases[1].command(), DramCommand::Activate);
    assert_eq!(sim.top().dfii.master.phases[0].command(), DramCommand::Deselect);
  }

  #[test]
  fn read_reports_value() {
    let mut sim = simulator();
    sim.execute(Command::Write {
      reg: "pi0_baddress".to_string(),
      value: 5,
    })
    .unwrap();
    let outcome = sim
      .execute(Command::Read {
        reg: "pi0_baddress".to_string(),
      })
      .unwrap();
    assert_eq!(outcome, Outcome::Continue(Some("pi0_baddress = 0x5".to_string())));
  }

  #[test]
  fn script_errors_name_the_line() {
    let mut sim = simulator();
    let err = sim.run_lines("init.dfii", "ctl sel\n\nw pi9_address 1").unwrap_err();
    assert_eq!(
      err.to_string(),
      "init.dfii:3: phase 9 out of range, injector has 2 phases"
    );
  }

  #[test]
  fn quit_stops_the_script() {
    let mut sim = simulator();
    let outcome = sim.run_lines("test", "si 3\nq\nsi 5").unwrap();
    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(sim.cycle(), 3);
  }
}
