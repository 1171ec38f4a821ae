use log::{debug, trace};

use super::CommandOpcode;
use crate::builtin::Module;
use crate::csr::{CsrAccess, CsrInfo, CsrStatus, CsrStorage, CsrStrobe, Persistence, PhaseReg};
use crate::dfi::{DfiParams, PhaseIn, PhaseOut};
use crate::error::CsrError;

const COMMAND_BITS: usize = 6;

/// Software command encoder for one DFI phase.
///
/// Software stages an opcode, address, bank and write data, then pulses the
/// issue strobe. In the cycle the strobe is active the opcode drives the
/// command strobes; in every other cycle they sit de-asserted, so a stale
/// opcode never reaches the bus. Address, bank and write data are driven
/// continuously.
///
/// Read data is latched from the inbound port on every cycle that reports
/// it valid.
pub struct PhaseInjector {
  name: String,
  nranks: usize,

  command: CsrStorage,
  command_issue: CsrStrobe,
  // survive reset
  address: CsrStorage,
  baddress: CsrStorage,
  wrdata: CsrStorage,
  rddata: CsrStatus,

  // Input: read data from the bus
  pub inbound: PhaseIn,

  // Output: this phase's command path
  pub phase: PhaseOut,
}

impl PhaseInjector {
  pub fn new(name: impl Into<String>, params: &DfiParams) -> Self {
    Self {
      name: name.into(),
      nranks: params.nranks,
      command: CsrStorage::new(COMMAND_BITS),
      command_issue: CsrStrobe::new(),
      address: CsrStorage::reset_less(params.address_bits),
      baddress: CsrStorage::reset_less(params.bank_bits),
      wrdata: CsrStorage::reset_less(params.data_bits),
      rddata: CsrStatus::new(params.data_bits),
      inbound: PhaseIn::default(),
      phase: PhaseOut::idle(params),
    }
  }

  pub fn write_command(&mut self, opcode: CommandOpcode) {
    self.command.write(u128::from(opcode.bits()));
  }

  pub fn command(&self) -> CommandOpcode {
    CommandOpcode::from_bits_truncate(self.command.storage() as u8)
  }

  /// Pulse the issue strobe for the next cycle
  pub fn issue(&mut self) {
    self.command_issue.fire();
  }

  pub fn issue_pending(&self) -> bool {
    self.command_issue.re()
  }

  pub fn write_address(&mut self, address: u32) {
    self.address.write(u128::from(address));
  }

  pub fn address(&self) -> u32 {
    self.address.storage() as u32
  }

  pub fn write_bank(&mut self, bank: u8) {
    self.baddress.write(u128::from(bank));
  }

  pub fn bank(&self) -> u8 {
    self.baddress.storage() as u8
  }

  pub fn write_wrdata(&mut self, data: u128) {
    self.wrdata.write(data);
  }

  pub fn wrdata(&self) -> u128 {
    self.wrdata.storage()
  }

  /// Last read data captured from the bus
  pub fn read_data(&self) -> u128 {
    self.rddata.status()
  }

  /// Combinational output for the current register state
  pub fn drive(&self) -> PhaseOut {
    let issue = self.issue_pending();
    let opcode = self.command();
    let (cs_n, we_n, cas_n, ras_n) = if issue {
      (
        !opcode.contains(CommandOpcode::CS),
        !opcode.contains(CommandOpcode::WE),
        !opcode.contains(CommandOpcode::CAS),
        !opcode.contains(CommandOpcode::RAS),
      )
    } else {
      (true, true, true, true)
    };

    PhaseOut {
      cs_n: vec![cs_n; self.nranks],
      we_n,
      cas_n,
      ras_n,
      address: self.address(),
      bank: self.bank(),
      wrdata: self.wrdata(),
      // no partial-write masking
      wrdata_mask: 0,
      wrdata_en: issue && opcode.contains(CommandOpcode::WRDATA),
      rddata_en: issue && opcode.contains(CommandOpcode::RDDATA),
    }
  }

  pub(crate) fn csr_write(&mut self, reg: PhaseReg, value: u128) -> Result<(), CsrError> {
    match reg {
      PhaseReg::Command => self.command.write(value),
      PhaseReg::CommandIssue => self.issue(),
      PhaseReg::Address => self.address.write(value),
      PhaseReg::Baddress => self.baddress.write(value),
      PhaseReg::Wrdata => self.wrdata.write(value),
      PhaseReg::Rddata => return Err(CsrError::ReadOnly(self.reg_name(reg))),
    }
    Ok(())
  }

  pub(crate) fn csr_read(&self, reg: PhaseReg) -> Result<u128, CsrError> {
    match reg {
      PhaseReg::Command => Ok(self.command.storage()),
      PhaseReg::CommandIssue => Err(CsrError::WriteOnly(self.reg_name(reg))),
      PhaseReg::Address => Ok(self.address.storage()),
      PhaseReg::Baddress => Ok(self.baddress.storage()),
      PhaseReg::Wrdata => Ok(self.wrdata.storage()),
      PhaseReg::Rddata => Ok(self.rddata.status()),
    }
  }

  pub(crate) fn csr_map(&self) -> Vec<CsrInfo> {
    PhaseReg::ALL
      .into_iter()
      .map(|reg| {
        let (width, access, persistence) = match reg {
          PhaseReg::Command => (self.command.width(), CsrAccess::ReadWrite, storage_persistence(&self.command)),
          PhaseReg::CommandIssue => (1, CsrAccess::WriteOnly, Persistence::Strobe),
          PhaseReg::Address => (self.address.width(), CsrAccess::ReadWrite, storage_persistence(&self.address)),
          PhaseReg::Baddress => (self.baddress.width(), CsrAccess::ReadWrite, storage_persistence(&self.baddress)),
          PhaseReg::Wrdata => (self.wrdata.width(), CsrAccess::ReadWrite, storage_persistence(&self.wrdata)),
          PhaseReg::Rddata => (self.rddata.width(), CsrAccess::ReadOnly, Persistence::Status),
        };
        CsrInfo {
          name: self.reg_name(reg),
          width,
          access,
          persistence,
        }
      })
      .collect()
  }

  fn reg_name(&self, reg: PhaseReg) -> String {
    format!("{}_{}", self.name, reg.suffix())
  }
}

fn storage_persistence(csr: &CsrStorage) -> Persistence {
  if csr.survives_reset() {
    Persistence::SurvivesReset
  } else {
    Persistence::Persistent
  }
}

impl Module for PhaseInjector {
  fn run(&mut self) {
    self.phase = self.drive();
    if self.issue_pending() {
      debug!(
        "[{}] {} opcode={:#04x} addr={:#x} bank={}",
        self.name,
        self.phase.command(),
        self.command().bits(),
        self.phase.address,
        self.phase.bank
      );
    }

    // clock edge
    if let Some(&data) = self.inbound.get() {
      trace!("[{}] captured rddata={:#x}", self.name, data);
      self.rddata.update(data);
    }
    self.command_issue.clear();
  }

  fn reset(&mut self) {
    self.command.reset();
    self.command_issue.clear();
    self.address.reset();
    self.baddress.reset();
    self.wrdata.reset();
    self.rddata.reset();
    self.inbound = PhaseIn::default();
    self.phase = self.drive();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
