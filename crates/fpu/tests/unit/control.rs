//! # Control Register Move Tests

use m68k_fpu::CpuBus;
use pretty_assertions::assert_eq;

use crate::common::harness::{CODE, DATA, TestContext};

#[test]
fn fpcr_write_is_masked() {
    let mut ctx = TestContext::default();
    ctx.bus.d[0] = 0x1234_5678;
    ctx.exec(&[0xf200, 0x9000]);
    assert_eq!(ctx.fpu.fpcr(), 0x5670);
}

#[test]
fn fpsr_write_is_masked() {
    let mut ctx = TestContext::default();
    ctx.bus.d[0] = 0xffff_ffff;
    ctx.exec(&[0xf200, 0x8800]);
    assert_eq!(ctx.fpu.fpsr(), 0x0fff_fff8);
    ctx.exec(&[0xf201, 0xa800]);
    assert_eq!(ctx.bus.d[1], 0x0fff_fff8);
}

#[test]
fn fpiar_through_address_register() {
    let mut ctx = TestContext::default();
    ctx.bus.a[3] = 0xdead_beef;
    ctx.exec(&[0xf20b, 0x8400]);
    ctx.exec(&[0xf200, 0xa400]);
    assert_eq!(ctx.bus.d[0], 0xdead_beef);
}

#[test]
fn fpcr_through_address_register_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf20b, 0x9000]).is_err());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn multiple_registers_to_data_register_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf200, 0xb800]).is_err());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn all_control_registers_predecrement() {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(0x0010);
    ctx.fpu.set_fpsr(0x0800_0000);
    ctx.bus.d[0] = CODE;
    ctx.exec(&[0xf200, 0x8400]);
    ctx.bus.a[0] = DATA + 12;
    ctx.exec(&[0xf220, 0xbc00]);
    assert_eq!(ctx.bus.a[0], DATA);
    assert_eq!(ctx.bus.read_longs(DATA, 3), vec![0x0010, 0x0800_0000, CODE]);
}

#[test]
fn postincrement_load_in_fixed_order() {
    let mut ctx = TestContext::default();
    ctx.bus.write_long(DATA, 0x0020);
    ctx.bus.write_long(DATA + 4, 0x0400_0000);
    ctx.bus.a[0] = DATA;
    ctx.exec(&[0xf218, 0x9800]);
    assert_eq!(ctx.fpu.fpcr(), 0x0020);
    assert_eq!(ctx.fpu.fpsr(), 0x0400_0000);
    assert_eq!(ctx.bus.a[0], DATA + 8);
}

#[test]
fn immediate_may_load_several_registers() {
    let mut ctx = TestContext::default();
    ctx.exec(&[0xf23c, 0x9800, 0x0000, 0x0030, 0x0200, 0x0000]);
    assert_eq!(ctx.fpu.fpcr(), 0x0030);
    assert_eq!(ctx.fpu.fpsr(), 0x0200_0000);
    assert_eq!(ctx.bus.pc, CODE + 12);
}

#[test]
fn immediate_destination_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf23c, 0xb000]).is_err());
}
