//! Scratchpad stand-in for the physical layer
use std::collections::{HashMap, VecDeque};

use log::trace;

use crate::builtin::Module;
use crate::dfi::{DfiBundle, DfiParams, PhaseIn};

/// Physical-layer stand-in backed by a word store.
///
/// Write data of every phase with `wrdata_en` is stored under its
/// (bank, address); a phase with `rddata_en` gets the stored word (0 if never
/// written) back on the same phase `read_latency` cycles later. No DRAM
/// timing is modelled.
pub struct ScratchpadPhy {
  name: String,
  nphases: usize,
  data_bits: usize,
  read_latency: usize,

  spad: HashMap<(u8, u32), u128>,
  pipeline: VecDeque<Vec<PhaseIn>>,

  // Input: downstream port of the injector
  pub dfi: DfiBundle,

  // Output: read data, one entry per phase
  pub rddata: Vec<PhaseIn>,
}

impl ScratchpadPhy {
  /// `read_latency` counts cycles from the read command to valid data, at least 1
  pub fn new(name: impl Into<String>, params: &DfiParams, read_latency: usize) -> Self {
    let read_latency = read_latency.max(1);
    Self {
      name: name.into(),
      nphases: params.nphases,
      data_bits: params.data_bits,
      read_latency,
      spad: HashMap::new(),
      pipeline: Self::empty_pipeline(params.nphases, read_latency),
      dfi: DfiBundle::idle(params),
      rddata: vec![PhaseIn::default(); params.nphases],
    }
  }

  fn empty_pipeline(nphases: usize, read_latency: usize) -> VecDeque<Vec<PhaseIn>> {
    (1..read_latency).map(|_| vec![PhaseIn::default(); nphases]).collect()
  }

  /// Stored word, 0 if never written
  pub fn read_data(&self, bank: u8, address: u32) -> u128 {
    self.spad.get(&(bank, address)).copied().unwrap_or(0)
  }

  fn merge(&self, old: u128, new: u128, mask: u16) -> u128 {
    (0..self.data_bits / 8).fold(0u128, |word, byte| {
      let source = if (mask >> byte) & 1 == 1 { old } else { new };
      word | (source & (0xffu128 << (byte * 8)))
    })
  }
}

impl Module for ScratchpadPhy {
  fn run(&mut self) {
    let mut responses = vec![PhaseIn::default(); self.nphases];

    for (n, phase) in self.dfi.phases.iter().enumerate() {
      let key = (phase.bank, phase.address);
      if phase.wrdata_en {
        let word = self.merge(self.read_data(key.0, key.1), phase.wrdata, phase.wrdata_mask);
        trace!("[{}] p{} write bank={} addr={:#x} data={:#x}", self.name, n, key.0, key.1, word);
        self.spad.insert(key, word);
      }
      if phase.rddata_en {
        if let Some(response) = responses.get_mut(n) {
          response.set(self.read_data(key.0, key.1));
        }
      }
    }

    self.pipeline.push_back(responses);
    if let Some(out) = self.pipeline.pop_front() {
      self.rddata = out;
    }
  }

  fn reset(&mut self) {
    self.pipeline = Self::empty_pipeline(self.nphases, self.read_latency);
    self.rddata = vec![PhaseIn::default(); self.nphases];
  }

  fn name(&self) -> &str {
    &self.name
  }
}
