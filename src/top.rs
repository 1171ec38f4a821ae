//! Top module: automatic controller -> injector -> PHY
use crate::builtin::Module;
use crate::controller::NopController;
use crate::dfi::DfiParams;
use crate::error::ConfigError;
use crate::injector::DfiInjector;
use crate::phy::ScratchpadPhy;

pub struct Top {
  name: String,

  // Automatic controller on the injector's slave port
  pub controller: NopController,

  pub dfii: DfiInjector,

  pub phy: ScratchpadPhy,
}

impl Top {
  pub fn new(name: impl Into<String>, params: DfiParams, read_latency: usize) -> Result<Self, ConfigError> {
    Ok(Self {
      name: name.into(),
      controller: NopController::new("ctrl", &params),
      dfii: DfiInjector::new("dfii", params)?,
      phy: ScratchpadPhy::new("phy", &params, read_latency),
    })
  }
}

impl Module for Top {
  fn run(&mut self) {
    // Command path is combinational from the controller through to the PHY;
    // read data reaches the injector from the PHY's previous cycle.
    self.controller.run();

    self.dfii.slave = self.controller.output.clone();
    self.dfii.master_in = self.phy.rddata.clone();
    self.dfii.run();

    self.phy.dfi = self.dfii.master.clone();
    self.phy.run();
  }

  fn reset(&mut self) {
    self.controller.reset();
    self.dfii.reset();
    self.phy.reset();
  }

  fn name(&self) -> &str {
    &self.name
  }
}
