//! # Packed Decimal Tests
//!
//! FMOVE.P in both directions, with static and dynamic k-factors.

use m68k_fpu::{BackendKind, FpuModel};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{DATA, TestContext, mem_op};

const INEX2: u32 = 0x0200;

/// FMOVE.P FP0,(A0){#k}
fn store_packed(ctx: &mut TestContext, value: f64, k: u16) -> Vec<u32> {
    ctx.set(0, value);
    ctx.bus.a[0] = DATA;
    ctx.exec(&[0xf210, 0x6c00 | (k & 0x7f)]);
    ctx.bus.read_longs(DATA, 3)
}

/// The exponent field belongs to the rounded leading digit: -1.2E+2.
#[rstest]
fn k_two_keeps_leading_digit_exponent(#[values(BackendKind::Ieee, BackendKind::Extended)] backend: BackendKind) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    let words = store_packed(&mut ctx, -123.45, 2);
    assert_eq!(words, vec![0x8002_0001, 0x2000_0000, 0]);
    assert_eq!(ctx.exceptions() & INEX2, INEX2);
}

#[test]
fn negative_k_counts_digits_after_the_point() {
    let mut ctx = TestContext::default();
    let words = store_packed(&mut ctx, -123.45, (-2i16) as u16);
    assert_eq!(words, vec![0x8002_0001, 0x2345_0000, 0]);
}

#[test]
fn legacy_backend_always_writes_seventeen_digits() {
    let mut ctx = TestContext::new(BackendKind::Legacy, FpuModel::Mc68881);
    let words = store_packed(&mut ctx, -123.45, 2);
    assert_eq!(words, vec![0x8002_0001, 0x2345_0000, 0]);
}

#[test]
fn negative_exponent_sets_exponent_sign() {
    let mut ctx = TestContext::default();
    let words = store_packed(&mut ctx, 0.015625, 17);
    assert_eq!(words, vec![0x4002_0001, 0x5625_0000, 0]);
    assert_eq!(ctx.exceptions(), 0);
}

#[test]
fn dynamic_k_factor_reads_data_register() {
    let mut ctx = TestContext::default();
    ctx.set(0, -123.45);
    ctx.bus.a[0] = DATA;
    ctx.bus.d[1] = 2;
    ctx.exec(&[0xf210, 0x7c10]);
    assert_eq!(ctx.bus.read_longs(DATA, 3), vec![0x8002_0001, 0x2000_0000, 0]);
}

#[test]
fn load_packed_operand() {
    let mut ctx = TestContext::default();
    ctx.bus.a[0] = DATA;
    for (i, word) in [0x0000_0001u32, 0x5000_0000, 0].into_iter().enumerate() {
        m68k_fpu::CpuBus::write_long(&mut ctx.bus, DATA + 4 * i as u32, word);
    }
    ctx.exec(&[0xf210, mem_op(3, 0, 0x00)]);
    assert_eq!(ctx.get(0), 1.5);
    assert_eq!(ctx.exceptions(), 0);
}

#[test]
fn inexact_packed_load_sets_inex1() {
    let mut ctx = TestContext::default();
    ctx.bus.a[0] = DATA;
    // 1.00000000000000001E-1 has no exact binary form.
    for (i, word) in [0x4001_0001u32, 0x0000_0000, 0x0000_0001].into_iter().enumerate() {
        m68k_fpu::CpuBus::write_long(&mut ctx.bus, DATA + 4 * i as u32, word);
    }
    ctx.exec(&[0xf210, mem_op(3, 0, 0x00)]);
    assert_eq!(ctx.exceptions(), 0x0100);
}

#[test]
fn packed_immediate_source_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf23c, mem_op(3, 0, 0x00), 0, 0, 0, 0, 0, 0]).is_err());
}
