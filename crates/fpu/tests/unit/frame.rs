//! # FSAVE/FRESTORE Tests

use m68k_fpu::{BackendKind, Completion, CpuBus, FpuModel, FpuRegister};
use pretty_assertions::assert_eq;

use crate::common::harness::{CODE, DATA, STACK, TestContext};

fn save(ctx: &mut TestContext, opcode: u16) -> m68k_fpu::FpuResult<Completion> {
    ctx.bus.pc = CODE + 2;
    ctx.fpu.save(&mut ctx.bus, opcode)
}

fn restore(ctx: &mut TestContext, opcode: u16) -> m68k_fpu::FpuResult<Completion> {
    ctx.bus.pc = CODE + 2;
    ctx.fpu.restore(&mut ctx.bus, opcode)
}

#[test]
fn mc68881_idle_frame() {
    let mut ctx = TestContext::default();
    assert_eq!(save(&mut ctx, 0xf327).expect("legal"), Completion::Done);
    assert_eq!(ctx.bus.a[7], STACK - 28);
    let frame = ctx.bus.read_longs(STACK - 28, 7);
    assert_eq!(frame, vec![0x1f18_0000, 0, 0, 0, 0, 0, 0x7000_0000]);
}

#[test]
fn mc68040_idle_frame() {
    let mut ctx = TestContext::new(BackendKind::Ieee, FpuModel::Mc68040);
    let _ = save(&mut ctx, 0xf327).expect("legal");
    assert_eq!(ctx.bus.a[7], STACK - 4);
    assert_eq!(ctx.bus.read_long(STACK - 4), 0x4100_0000);
}

#[test]
fn restoring_idle_frame_keeps_state() {
    let mut ctx = TestContext::default();
    ctx.set(0, 3.0);
    ctx.fpu.set_fpcr(0x0010);
    let _ = save(&mut ctx, 0xf327).expect("legal");
    let _ = restore(&mut ctx, 0xf35f).expect("legal");
    assert_eq!(ctx.bus.a[7], STACK);
    assert_eq!(ctx.get(0), 3.0);
    assert_eq!(ctx.fpu.fpcr(), 0x0010);
}

#[test]
fn null_frame_resets() {
    let mut ctx = TestContext::default();
    ctx.set(0, 3.0);
    ctx.fpu.set_fpcr(0x0010);
    ctx.bus.write_long(DATA, 0);
    ctx.bus.a[0] = DATA;
    let _ = restore(&mut ctx, 0xf350).expect("legal");
    assert_eq!(ctx.fpu.register(0), FpuRegister::default_nan());
    assert_eq!(ctx.fpu.fpcr(), 0);
}

#[test]
fn busy_frame_is_skipped_by_length() {
    let mut ctx = TestContext::default();
    ctx.set(0, 3.0);
    ctx.bus.write_long(DATA, 0x1fb4_0000);
    ctx.bus.a[0] = DATA;
    let _ = restore(&mut ctx, 0xf358).expect("legal");
    assert_eq!(ctx.bus.a[0], DATA + 4 + 0xb4);
    assert_eq!(ctx.get(0), 3.0);
}

#[test]
fn save_to_postincrement_is_illegal() {
    let mut ctx = TestContext::default();
    let err = save(&mut ctx, 0xf31f).expect_err("illegal");
    assert!(err.is_illegal_instruction());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn restore_from_predecrement_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(restore(&mut ctx, 0xf367).is_err());
    assert_eq!(ctx.bus.pc, CODE);
    assert_eq!(ctx.bus.a[7], STACK);
}
