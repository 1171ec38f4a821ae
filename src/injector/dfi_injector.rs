use log::{debug, info};

use super::{ControlFlags, PhaseInjector};
use crate::builtin::Module;
use crate::csr::{CsrAccess, CsrInfo, CsrStorage, Persistence, RegName};
use crate::dfi::{DfiBundle, DfiParams, PhaseIn, Sideband};
use crate::error::{ConfigError, CsrError};

const CONTROL_BITS: usize = 4;

/// DFI command injector.
///
/// Sits between an automatic memory controller (`slave`) and the PHY
/// (`master`). With `SEL` set in the control register the downstream port
/// carries the phase injectors' bundle, otherwise the controller's bundle
/// passes through unchanged. The substitution covers the whole command
/// path; the read-data return path follows the same selection.
///
/// Rank sideband lines (CKE, ODT, RESET_N) are not part of the selected
/// bundle: they are always driven from the control register.
pub struct DfiInjector {
  name: String,
  params: DfiParams,
  control: CsrStorage,
  phases: Vec<PhaseInjector>,

  // Input: automatic controller command path
  pub slave: DfiBundle,
  // Output: read data returned to the automatic controller
  pub slave_in: Vec<PhaseIn>,

  // Output: downstream command path
  pub master: DfiBundle,
  // Input: read data from the PHY
  pub master_in: Vec<PhaseIn>,

  // Output: rank sideband, one entry per phase
  pub sideband: Vec<Sideband>,
}

impl DfiInjector {
  pub fn new(name: impl Into<String>, params: DfiParams) -> Result<Self, ConfigError> {
    params.validate()?;
    let name = name.into();
    let phases = (0..params.nphases)
      .map(|n| PhaseInjector::new(format!("pi{}", n), &params))
      .collect();

    let mut injector = Self {
      name,
      params,
      control: CsrStorage::new(CONTROL_BITS),
      phases,
      slave: DfiBundle::idle(&params),
      slave_in: vec![PhaseIn::default(); params.nphases],
      master: DfiBundle::idle(&params),
      master_in: vec![PhaseIn::default(); params.nphases],
      sideband: Vec::new(),
    };
    injector.sideband = injector.fan_out();
    Ok(injector)
  }

  pub fn params(&self) -> &DfiParams {
    &self.params
  }

  /// Attach the automatic controller's bundle after checking its shape
  pub fn connect_slave(&mut self, bundle: DfiBundle) -> Result<(), ConfigError> {
    bundle.check_shape(&self.params)?;
    self.slave = bundle;
    Ok(())
  }

  pub fn write_control(&mut self, flags: ControlFlags) {
    let previous = self.control();
    self.control.write(u128::from(flags.bits()));
    let control = self.control();
    if previous.select_manual() != control.select_manual() {
      let mode = if control.select_manual() { "manual" } else { "automatic" };
      info!("[{}] {} mode, control={:?}", self.name, mode, control);
    } else if previous != control {
      info!("[{}] control={:?}", self.name, control);
    } else {
      debug!("[{}] control={:?} (unchanged)", self.name, control);
    }
  }

  pub fn control(&self) -> ControlFlags {
    ControlFlags::from_bits_truncate(self.control.storage() as u8)
  }

  pub fn manual_selected(&self) -> bool {
    self.control().select_manual()
  }

  pub fn nphases(&self) -> usize {
    self.phases.len()
  }

  pub fn phase(&self, n: usize) -> Option<&PhaseInjector> {
    self.phases.get(n)
  }

  pub fn phase_mut(&mut self, n: usize) -> Option<&mut PhaseInjector> {
    self.phases.get_mut(n)
  }

  pub fn phases(&self) -> &[PhaseInjector] {
    &self.phases
  }

  /// Bundle the phase injectors drive this cycle
  pub fn manual_bundle(&self) -> DfiBundle {
    DfiBundle {
      phases: self.phases.iter().map(PhaseInjector::drive).collect(),
    }
  }

  /// Combinational downstream bundle for the current state and `slave`
  pub fn evaluate(&self) -> DfiBundle {
    if self.manual_selected() {
      self.manual_bundle()
    } else {
      self.slave.clone()
    }
  }

  /// Sideband lines as driven from the control register
  pub fn fan_out(&self) -> Vec<Sideband> {
    let control = self.control();
    let sideband = Sideband::new(
      &self.params,
      control.contains(ControlFlags::CKE),
      control.contains(ControlFlags::ODT),
      control.contains(ControlFlags::RESET_N),
    );
    vec![sideband; self.params.nphases]
  }

  pub fn csr_write(&mut self, name: &str, value: u128) -> Result<(), CsrError> {
    match name.parse::<RegName>()? {
      RegName::Control => {
        self.write_control(ControlFlags::from_bits_truncate(value as u8));
        Ok(())
      }
      RegName::Phase(n, reg) => self.phase_checked_mut(n)?.csr_write(reg, value),
    }
  }

  pub fn csr_read(&self, name: &str) -> Result<u128, CsrError> {
    match name.parse::<RegName>()? {
      RegName::Control => Ok(self.control.storage()),
      RegName::Phase(n, reg) => self.phase_checked(n)?.csr_read(reg),
    }
  }

  /// Every register, `control` first, then each phase in order
  pub fn csr_map(&self) -> Vec<CsrInfo> {
    let control = CsrInfo {
      name: RegName::Control.to_string(),
      width: self.control.width(),
      access: CsrAccess::ReadWrite,
      persistence: Persistence::Persistent,
    };
    std::iter::once(control)
      .chain(self.phases.iter().flat_map(PhaseInjector::csr_map))
      .collect()
  }

  fn phase_checked(&self, n: usize) -> Result<&PhaseInjector, CsrError> {
    let nphases = self.phases.len();
    self.phases.get(n).ok_or(CsrError::PhaseOutOfRange { phase: n, nphases })
  }

  fn phase_checked_mut(&mut self, n: usize) -> Result<&mut PhaseInjector, CsrError> {
    let nphases = self.phases.len();
    self.phases.get_mut(n).ok_or(CsrError::PhaseOutOfRange { phase: n, nphases })
  }
}

impl Module for DfiInjector {
  fn run(&mut self) {
    let manual = self.manual_selected();

    // Return path follows the selection
    for (n, pi) in self.phases.iter_mut().enumerate() {
      pi.inbound = match self.master_in.get(n) {
        Some(inbound) if manual => inbound.clone(),
        _ => PhaseIn::default(),
      };
    }
    self.slave_in = if manual {
      vec![PhaseIn::default(); self.params.nphases]
    } else {
      self.master_in.clone()
    };

    for pi in self.phases.iter_mut() {
      pi.run();
    }

    self.master = if manual {
      DfiBundle {
        phases: self.phases.iter().map(|pi| pi.phase.clone()).collect(),
      }
    } else {
      self.slave.clone()
    };
    self.sideband = self.fan_out();
  }

  fn reset(&mut self) {
    self.control.reset();
    for pi in self.phases.iter_mut() {
      pi.reset();
    }
    self.master_in = vec![PhaseIn::default(); self.params.nphases];
    self.slave_in = vec![PhaseIn::default(); self.params.nphases];
    self.master = self.evaluate();
    self.sideband = self.fan_out();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
