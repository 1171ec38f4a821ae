/// All-ones value of `width` bits
pub fn width_mask(width: usize) -> u128 {
  if width >= 128 {
    u128::MAX
  } else {
    (1u128 << width) - 1
  }
}

/// Software-written register, held until overwritten.
///
/// A reset-less storage ignores system reset so that values staged by
/// software survive it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrStorage {
  width: usize,
  value: u128,
  reset_less: bool,
}

impl CsrStorage {
  pub fn new(width: usize) -> Self {
    Self {
      width,
      value: 0,
      reset_less: false,
    }
  }

  pub fn reset_less(width: usize) -> Self {
    Self {
      reset_less: true,
      ..Self::new(width)
    }
  }

  /// Bits above the register width are dropped
  pub fn write(&mut self, value: u128) {
    self.value = value & width_mask(self.width);
  }

  pub fn storage(&self) -> u128 {
    self.value
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn survives_reset(&self) -> bool {
    self.reset_less
  }

  pub fn reset(&mut self) {
    if !self.reset_less {
      self.value = 0;
    }
  }
}

/// Hardware-written register, read by software
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrStatus {
  width: usize,
  status: u128,
}

impl CsrStatus {
  pub fn new(width: usize) -> Self {
    Self { width, status: 0 }
  }

  pub fn update(&mut self, value: u128) {
    self.status = value & width_mask(self.width);
  }

  pub fn status(&self) -> u128 {
    self.status
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn reset(&mut self) {
    self.status = 0;
  }
}

/// Write-triggered pulse, active for the cycle after the write and nothing is stored
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsrStrobe {
  re: bool,
}

impl CsrStrobe {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fire(&mut self) {
    self.re = true;
  }

  pub fn re(&self) -> bool {
    self.re
  }

  /// Clock edge: the pulse lasts one cycle
  pub fn clear(&mut self) {
    self.re = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mask_covers_full_width() {
    assert_eq!(width_mask(1), 1);
    assert_eq!(width_mask(14), 0x3fff);
    assert_eq!(width_mask(128), u128::MAX);
  }

  #[test]
  fn storage_truncates_to_width() {
    let mut csr = CsrStorage::new(6);
    csr.write(0xff);
    assert_eq!(csr.storage(), 0x3f);
  }

  #[test]
  fn reset_less_storage_survives_reset() {
    let mut plain = CsrStorage::new(8);
    let mut kept = CsrStorage::reset_less(8);
    plain.write(0x5a);
    kept.write(0x5a);

    plain.reset();
    kept.reset();

    assert_eq!(plain.storage(), 0);
    assert_eq!(kept.storage(), 0x5a);
  }

  #[test]
  fn strobe_is_one_shot() {
    let mut strobe = CsrStrobe::new();
    strobe.fire();
    assert!(strobe.re());
    strobe.clear();
    assert!(!strobe.re());
  }
}
