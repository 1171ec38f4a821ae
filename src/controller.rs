//! Stand-in for the automatic memory controller on the injector's `slave` port
use crate::builtin::Module;
use crate::dfi::{DfiBundle, DfiParams};

/// Drives a NOP on every phase: ranks selected, no command strobes
pub struct NopController {
  name: String,
  params: DfiParams,

  // Output: command path towards the injector
  pub output: DfiBundle,
}

impl NopController {
  pub fn new(name: impl Into<String>, params: &DfiParams) -> Self {
    Self {
      name: name.into(),
      params: *params,
      output: Self::nop_bundle(params),
    }
  }

  fn nop_bundle(params: &DfiParams) -> DfiBundle {
    let mut bundle = DfiBundle::idle(params);
    for phase in bundle.phases.iter_mut() {
      phase.cs_n = vec![false; params.nranks];
    }
    bundle
  }
}

impl Module for NopController {
  fn run(&mut self) {
    self.output = Self::nop_bundle(&self.params);
  }

  fn reset(&mut self) {
    self.output = Self::nop_bundle(&self.params);
  }

  fn name(&self) -> &str {
    &self.name
  }
}
