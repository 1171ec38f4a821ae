use bitflags::bitflags;

bitflags! {
  /// Phase command register (`pi<N>_command`).
  ///
  /// Bit layout:
  /// ```text
  /// 5      4      3   2   1  0
  /// RDDATA WRDATA RAS CAS WE CS
  /// ```
  /// Bits are active-high enables; the injector inverts the strobes onto the
  /// active-low bus. The register only acts in the cycle its issue strobe fires.
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
  pub struct CommandOpcode: u8 {
    const CS = 0x01;
    const WE = 0x02;
    const CAS = 0x04;
    const RAS = 0x08;
    const WRDATA = 0x10;
    const RDDATA = 0x20;
  }
}

bitflags! {
  /// Injector control register (`control`).
  ///
  /// Bit layout:
  /// ```text
  /// 3       2   1   0
  /// RESET_N ODT CKE SEL
  /// ```
  /// - `SEL`: route the injector's phases onto the downstream port; clear
  ///   passes the automatic controller through.
  /// - `CKE`, `ODT`, `RESET_N`: driven onto every rank sideband line on every
  ///   phase, whatever `SEL` says.
  #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
  pub struct ControlFlags: u8 {
    const SEL = 0x01;
    const CKE = 0x02;
    const ODT = 0x04;
    const RESET_N = 0x08;
  }
}

impl ControlFlags {
  pub fn new(select_manual: bool, clock_enable: bool, termination_enable: bool, reset_active_low: bool) -> Self {
    let mut flags = Self::empty();
    flags.set(Self::SEL, select_manual);
    flags.set(Self::CKE, clock_enable);
    flags.set(Self::ODT, termination_enable);
    flags.set(Self::RESET_N, reset_active_low);
    flags
  }

  pub fn select_manual(self) -> bool {
    self.contains(Self::SEL)
  }
}
