//! # Operand Tests
//!
//! Effective-address resolution and the integer, single, double and extended formats
//! on both sides of the register file.

use m68k_fpu::{CpuBus, Fpu};
use m68k_fpu::backend::ieee::IeeeBackend;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::common::harness::{CODE, DATA, STACK, TestContext, mem_op};
use crate::common::mocks::MockCpu;

const OPERR: u32 = 0x2000;
const INEX2: u32 = 0x0200;

#[test]
fn data_register_integer_sources() {
    let mut ctx = TestContext::default();
    ctx.bus.d[2] = (-5i32) as u32;
    ctx.exec(&[0xf202, mem_op(0, 0, 0x00)]);
    assert_eq!(ctx.get(0), -5.0);
    ctx.bus.d[2] = 0x1234_ff80;
    ctx.exec(&[0xf202, mem_op(6, 1, 0x00)]);
    assert_eq!(ctx.get(1), -128.0);
    ctx.bus.d[2] = 1.5f32.to_bits();
    ctx.exec(&[0xf202, mem_op(1, 2, 0x00)]);
    assert_eq!(ctx.get(2), 1.5);
}

#[test]
fn data_register_cannot_hold_double() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf200, mem_op(5, 0, 0x00)]).is_err());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn double_immediate() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    let bits = 2.5f64.to_bits();
    ctx.exec(&[
        0xf23c,
        mem_op(5, 0, 0x22),
        (bits >> 48) as u16,
        (bits >> 32) as u16,
        (bits >> 16) as u16,
        bits as u16,
    ]);
    assert_eq!(ctx.get(0), 3.5);
    assert_eq!(ctx.bus.pc, CODE + 12);
}

#[test]
fn byte_immediate_uses_low_byte_of_word() {
    let mut ctx = TestContext::default();
    ctx.exec(&[0xf23c, mem_op(6, 0, 0x00), 0x00ff]);
    assert_eq!(ctx.get(0), -1.0);
    assert_eq!(ctx.bus.pc, CODE + 6);
}

#[test]
fn byte_postincrement_through_a7_keeps_stack_aligned() {
    let mut ctx = TestContext::default();
    ctx.bus.write_byte(STACK, 0x80);
    ctx.exec(&[0xf21f, mem_op(6, 0, 0x00)]);
    assert_eq!(ctx.get(0), -128.0);
    assert_eq!(ctx.bus.a[7], STACK + 2);
}

#[test]
fn predecrement_double_source() {
    let mut ctx = TestContext::default();
    let bits = 0.25f64.to_bits();
    ctx.bus.write_long(DATA, (bits >> 32) as u32);
    ctx.bus.write_long(DATA + 4, bits as u32);
    ctx.bus.a[1] = DATA + 8;
    ctx.set(0, 1.0);
    ctx.exec(&[0xf221, mem_op(5, 0, 0x22)]);
    assert_eq!(ctx.get(0), 1.25);
    assert_eq!(ctx.bus.a[1], DATA);
}

#[test]
fn indexed_single_source() {
    let mut ctx = TestContext::default();
    ctx.bus.write_long(DATA + 20, 3.0f32.to_bits());
    ctx.bus.a[0] = DATA;
    ctx.bus.d[1] = 8;
    // d8 = 4, D1.L * 2
    ctx.exec(&[0xf230, mem_op(1, 0, 0x00), 0x1a04]);
    assert_eq!(ctx.get(0), 3.0);
}

#[test]
fn address_register_source_is_illegal() {
    let mut ctx = TestContext::default();
    assert!(ctx.run(&[0xf208, mem_op(0, 0, 0x00)]).is_err());
}

#[test]
fn store_long_rounds_in_fpcr_mode() {
    let mut ctx = TestContext::default();
    ctx.set(0, 2.5);
    ctx.exec(&[0xf200, 0x6000]);
    assert_eq!(ctx.bus.d[0], 2);
    assert_eq!(ctx.exceptions(), INEX2);
    ctx.fpu.set_fpcr(0x30);
    ctx.exec(&[0xf200, 0x6000]);
    assert_eq!(ctx.bus.d[0], 3);
}

#[test]
fn store_byte_out_of_range_is_operand_error() {
    let mut ctx = TestContext::default();
    ctx.set(0, 300.0);
    ctx.exec(&[0xf200, 0x6000 | (6 << 10)]);
    assert_eq!(ctx.exceptions() & OPERR, OPERR);
}

#[test]
fn store_extended_predecrement() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    ctx.bus.a[0] = DATA + 12;
    ctx.exec(&[0xf220, 0x6800]);
    assert_eq!(ctx.bus.a[0], DATA);
    assert_eq!(ctx.bus.read_longs(DATA, 3), vec![0x3fff_0000, 0x8000_0000, 0]);
}

#[test]
fn store_to_pc_relative_is_illegal() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    assert!(ctx.run(&[0xf23a, 0x6400, 0x0010]).is_err());
    assert_eq!(ctx.bus.pc, CODE);
}

#[test]
fn control_register_store_touches_only_the_target_register() {
    let mut fpu = Fpu::new(IeeeBackend::new(), false);
    m68k_fpu::Coprocessor::set_fpcr(&mut fpu, 0x10);
    let mut cpu = MockCpu::new();
    let _ = cpu.expect_pc().return_const(CODE + 4);
    let _ = cpu.expect_set_d_reg().with(eq(3), eq(0x10)).times(1).return_const(());
    let completion = fpu.execute(&mut cpu, 0xf203, 0xb000).expect("legal");
    assert_eq!(completion, m68k_fpu::Completion::Done);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn single_round_trip_is_exact(bits in any::<u32>().prop_filter("not NaN", |b| !f32::from_bits(*b).is_nan())) {
        let mut ctx = TestContext::default();
        ctx.bus.write_long(DATA, bits);
        ctx.bus.a[0] = DATA;
        ctx.bus.a[1] = DATA + 4;
        ctx.exec(&[0xf210, mem_op(1, 0, 0x00)]);
        ctx.exec(&[0xf211, 0x6400]);
        prop_assert_eq!(ctx.bus.read_long(DATA + 4), bits);
        prop_assert_eq!(ctx.exceptions() & INEX2, 0);
    }
}
