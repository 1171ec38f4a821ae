use dfii::builtin::Module;
use dfii::simulator::log::init_test_log;
use dfii::{CommandOpcode, ControlFlags, DfiBundle, DfiInjector, DfiParams, DramCommand, PhaseOut};
use proptest::prelude::*;

fn scenario_params() -> DfiParams {
  DfiParams::new(8, 3, 1, 32, 1).unwrap()
}

fn injector(params: DfiParams) -> DfiInjector {
  init_test_log();
  DfiInjector::new("dfii", params).unwrap()
}

fn slave_strategy(params: DfiParams) -> impl Strategy<Value = DfiBundle> {
  let phase = (
    prop::collection::vec(any::<bool>(), params.nranks),
    any::<(bool, bool, bool)>(),
    0u32..(1 << params.address_bits),
    0u8..(1 << params.bank_bits),
    any::<u32>(),
    any::<(bool, bool)>(),
  )
    .prop_map(|(cs_n, (we_n, cas_n, ras_n), address, bank, wrdata, (wrdata_en, rddata_en))| PhaseOut {
      cs_n,
      we_n,
      cas_n,
      ras_n,
      address,
      bank,
      wrdata: u128::from(wrdata),
      wrdata_mask: 0,
      wrdata_en,
      rddata_en,
    });
  prop::collection::vec(phase, params.nphases).prop_map(|phases| DfiBundle { phases })
}

#[test]
fn manual_write_then_idle() {
  let mut dfii = injector(scenario_params());
  dfii.write_control(ControlFlags::SEL);

  let pi = dfii.phase_mut(0).unwrap();
  pi.write_command(
    CommandOpcode::CS | CommandOpcode::WE | CommandOpcode::CAS | CommandOpcode::RAS | CommandOpcode::WRDATA,
  );
  pi.write_address(0x0a);
  pi.write_bank(0x2);
  pi.write_wrdata(0xdead_beef);
  pi.issue();

  dfii.run();
  let phase = &dfii.master.phases[0];
  assert_eq!(phase.cs_n, vec![false]);
  assert!(!phase.we_n && !phase.cas_n && !phase.ras_n);
  assert_eq!(phase.address, 0x0a);
  assert_eq!(phase.bank, 0x2);
  assert_eq!(phase.wrdata, 0xdead_beef);
  assert!(phase.wrdata_en);
  assert_eq!(phase.wrdata_mask, 0);

  dfii.run();
  let phase = &dfii.master.phases[0];
  assert_eq!(phase.cs_n, vec![true]);
  assert!(phase.we_n && phase.cas_n && phase.ras_n);
  assert!(!phase.wrdata_en);
  assert_eq!(phase.address, 0x0a);
  assert_eq!(phase.bank, 0x2);
}

#[test]
fn chip_select_broadcast_to_every_rank() {
  let params = DfiParams::new(14, 3, 4, 64, 2).unwrap();
  let mut dfii = injector(params);
  dfii.write_control(ControlFlags::SEL);
  let pi = dfii.phase_mut(1).unwrap();
  pi.write_command(DramCommand::Refresh.opcode());
  pi.issue();

  dfii.run();

  assert_eq!(dfii.master.phases[1].cs_n, vec![false; 4]);
  assert_eq!(dfii.master.phases[1].command(), DramCommand::Refresh);
  assert_eq!(dfii.master.phases[0].cs_n, vec![true; 4]);
}

#[test]
fn read_data_captured_from_valid_pulse_only() {
  let mut dfii = injector(scenario_params());
  dfii.write_control(ControlFlags::SEL);

  dfii.master_in[0].set(0x600d_f00d);
  dfii.run();
  assert_eq!(dfii.phase(0).unwrap().read_data(), 0x600d_f00d);

  dfii.master_in[0].value = 0xbad;
  dfii.master_in[0].clear();
  for _ in 0..8 {
    dfii.run();
    assert_eq!(dfii.csr_read("pi0_rddata"), Ok(0x600d_f00d));
  }
}

#[test]
fn reset_keeps_calibration_registers() {
  let mut dfii = injector(scenario_params());
  dfii.csr_write("pi0_address", 0x0a).unwrap();
  dfii.csr_write("pi0_baddress", 0x2).unwrap();
  dfii.csr_write("pi0_wrdata", 0xdead_beef).unwrap();
  dfii.csr_write("pi0_command", 0x3f).unwrap();
  dfii.csr_write("control", 0xf).unwrap();

  dfii.reset();

  assert_eq!(dfii.csr_read("control"), Ok(0));
  assert_eq!(dfii.csr_read("pi0_command"), Ok(0));
  assert_eq!(dfii.csr_read("pi0_address"), Ok(0x0a));
  assert_eq!(dfii.csr_read("pi0_baddress"), Ok(0x2));
  assert_eq!(dfii.csr_read("pi0_wrdata"), Ok(0xdead_beef));
}

proptest! {
  #[test]
  fn no_issue_means_no_command(bits in 0u8..64, phases in 1usize..=4) {
    let params = DfiParams::new(8, 3, 2, 32, phases).unwrap();
    let mut dfii = injector(params);
    dfii.write_control(ControlFlags::SEL);
    for n in 0..phases {
      dfii.phase_mut(n).unwrap().write_command(CommandOpcode::from_bits_truncate(bits));
    }

    dfii.run();

    for phase in &dfii.master.phases {
      prop_assert_eq!(&phase.cs_n, &vec![true, true]);
      prop_assert!(phase.we_n && phase.cas_n && phase.ras_n);
      prop_assert!(!phase.wrdata_en && !phase.rddata_en);
    }
  }

  #[test]
  fn issued_strobes_reflect_opcode(bits in 0u8..64) {
    let opcode = CommandOpcode::from_bits_truncate(bits) | CommandOpcode::CS;
    let mut dfii = injector(DfiParams::new(8, 3, 2, 32, 1).unwrap());
    dfii.write_control(ControlFlags::SEL);
    dfii.phase_mut(0).unwrap().write_command(opcode);
    dfii.phase_mut(0).unwrap().issue();

    dfii.run();

    let phase = &dfii.master.phases[0];
    prop_assert_eq!(&phase.cs_n, &vec![false, false]);
    prop_assert_eq!(phase.we_n, !opcode.contains(CommandOpcode::WE));
    prop_assert_eq!(phase.cas_n, !opcode.contains(CommandOpcode::CAS));
    prop_assert_eq!(phase.ras_n, !opcode.contains(CommandOpcode::RAS));
    prop_assert_eq!(phase.wrdata_en, opcode.contains(CommandOpcode::WRDATA));
    prop_assert_eq!(phase.rddata_en, opcode.contains(CommandOpcode::RDDATA));
  }

  #[test]
  fn staged_registers_reach_the_bus(address in 0u32..(1 << 14), bank in 0u8..8, data in any::<u64>()) {
    let mut dfii = injector(DfiParams::new(14, 3, 1, 64, 1).unwrap());
    dfii.write_control(ControlFlags::SEL);
    let pi = dfii.phase_mut(0).unwrap();
    pi.write_address(address);
    pi.write_bank(bank);
    pi.write_wrdata(u128::from(data));
    pi.write_command(DramCommand::Write.opcode());
    pi.issue();

    dfii.run();

    let phase = &dfii.master.phases[0];
    prop_assert_eq!(phase.address, address);
    prop_assert_eq!(phase.bank, bank);
    prop_assert_eq!(phase.wrdata, u128::from(data));
    prop_assert!(phase.wrdata_en);
  }

  #[test]
  fn automatic_mode_is_transparent(slave in slave_strategy(DfiParams::new(8, 3, 2, 32, 2).unwrap()), bits in 0u8..64) {
    let mut dfii = injector(DfiParams::new(8, 3, 2, 32, 2).unwrap());
    dfii.connect_slave(slave.clone()).unwrap();
    dfii.phase_mut(0).unwrap().write_command(CommandOpcode::from_bits_truncate(bits));
    dfii.phase_mut(0).unwrap().write_address(0x5a);
    dfii.phase_mut(0).unwrap().issue();

    dfii.run();

    prop_assert_eq!(&dfii.master, &slave);
  }

  #[test]
  fn manual_mode_ignores_controller(slave in slave_strategy(DfiParams::new(8, 3, 2, 32, 2).unwrap())) {
    let mut dfii = injector(DfiParams::new(8, 3, 2, 32, 2).unwrap());
    dfii.write_control(ControlFlags::SEL);
    dfii.phase_mut(1).unwrap().write_command(DramCommand::Precharge.opcode());
    dfii.phase_mut(1).unwrap().issue();
    let expected = dfii.manual_bundle();

    dfii.connect_slave(slave).unwrap();
    dfii.run();

    prop_assert_eq!(&dfii.master, &expected);
  }

  #[test]
  fn sideband_ignores_selection(bits in 0u8..16) {
    let mut dfii = injector(DfiParams::new(8, 3, 2, 32, 4).unwrap());
    let control = ControlFlags::from_bits_truncate(bits);

    dfii.write_control(control - ControlFlags::SEL);
    dfii.run();
    let automatic = dfii.sideband.clone();

    dfii.write_control(control | ControlFlags::SEL);
    dfii.run();
    prop_assert_eq!(&dfii.sideband, &automatic);

    for sideband in &automatic {
      prop_assert_eq!(&sideband.cke, &vec![control.contains(ControlFlags::CKE); 2]);
      prop_assert_eq!(&sideband.odt, &Some(vec![control.contains(ControlFlags::ODT); 2]));
      prop_assert_eq!(sideband.reset_n, Some(control.contains(ControlFlags::RESET_N)));
    }
  }
}
