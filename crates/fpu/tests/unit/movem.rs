//! # FMOVEM Data Register Tests

use m68k_fpu::CpuBus;
use pretty_assertions::assert_eq;

use crate::common::harness::{CODE, DATA, STACK, TestContext};

#[test]
fn predecrement_save_and_postincrement_restore() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    ctx.set(1, -2.0);
    // FMOVEM.X FP0/FP1,-(A7)
    ctx.exec(&[0xf227, 0xe003]);
    assert_eq!(ctx.bus.a[7], STACK - 24);
    assert_eq!(
        ctx.bus.read_longs(STACK - 24, 6),
        vec![0x3fff_0000, 0x8000_0000, 0, 0xc000_0000, 0x8000_0000, 0]
    );
    // FMOVEM.X (A7)+,FP2/FP3
    ctx.exec(&[0xf21f, 0xd030]);
    assert_eq!(ctx.bus.a[7], STACK);
    assert_eq!(ctx.get(2), 1.0);
    assert_eq!(ctx.get(3), -2.0);
}

#[test]
fn dynamic_list_from_data_register() {
    let mut ctx = TestContext::default();
    ctx.set(7, 0.5);
    ctx.bus.a[0] = DATA;
    ctx.bus.d[2] = 0x01;
    // FMOVEM.X Dn,(A0) with the control-mode mask: 0x01 selects FP7
    ctx.exec(&[0xf210, 0xf820]);
    assert_eq!(ctx.bus.read_longs(DATA, 3), vec![0x3ffe_0000, 0x8000_0000, 0]);
    assert_eq!(ctx.bus.a[0], DATA);
}

#[test]
fn nan_payload_survives_memory() {
    let mut ctx = TestContext::default();
    ctx.set_nan(0, 0x8000_0000_0000_0001, true);
    ctx.bus.a[0] = DATA;
    ctx.exec(&[0xf210, 0xf080]);
    assert_eq!(ctx.bus.read_longs(DATA, 3), vec![0xffff_0000, 0x8000_0000, 1]);
    ctx.exec(&[0xf210, 0xd040]);
    assert_eq!(ctx.fpu.register(1), m68k_fpu::FpuRegister::NaN { payload: 0x8000_0000_0000_0001, negative: true });
    assert_eq!(ctx.exceptions(), 0, "no signaling check on FMOVEM");
}

#[test]
fn postincrement_destination_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf21f, 0xf080]).is_err());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn predecrement_source_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf227, 0xd080]).is_err());
    assert_eq!(ctx.bus.a[7], STACK);
}

#[test]
fn empty_list_moves_nothing() {
    let mut ctx = TestContext::default();
    ctx.bus.a[0] = DATA;
    ctx.bus.write_long(DATA, 0x1234_5678);
    ctx.exec(&[0xf210, 0xf000]);
    assert_eq!(ctx.bus.read_long(DATA), 0x1234_5678);
}
