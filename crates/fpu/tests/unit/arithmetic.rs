//! # General Arithmetic Tests
//!
//! Register-to-register operations across every backend, plus the precision and
//! rounding controls taken from the FPCR.

use m68k_fpu::{BackendKind, Completion, FpuModel};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{TestContext, reg_op};

const N: u32 = 0x0800_0000;
const Z: u32 = 0x0400_0000;
const INF: u32 = 0x0200_0000;
const NAN: u32 = 0x0100_0000;

const OPERR: u32 = 0x2000;
const OVFL: u32 = 0x1000;
const DZ: u32 = 0x0400;
const INEX2: u32 = 0x0200;

#[rstest]
fn divide_by_zero_gives_infinity(
    #[values(BackendKind::Ieee, BackendKind::Legacy, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.set(0, 1.0);
    ctx.set(1, 0.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x20)]);
    assert_eq!(ctx.get(0), f64::INFINITY);
    assert_eq!(ctx.exceptions(), DZ);
    assert_eq!(ctx.condition(), INF);
    assert_eq!(ctx.fpu.fpsr() & 0x10, 0x10, "accrued DZ");
}

#[rstest]
fn opposite_infinities_add_to_nan(
    #[values(BackendKind::Ieee, BackendKind::Legacy, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.set(0, f64::INFINITY);
    ctx.set(1, f64::NEG_INFINITY);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x22)]);
    assert!(ctx.get(0).is_nan());
    assert_eq!(ctx.exceptions(), OPERR);
    assert_eq!(ctx.condition(), NAN);
    assert_eq!(ctx.fpu.fpsr() & 0x80, 0x80, "accrued IOP");
}

#[rstest]
fn fmod_sets_quotient_byte(
    #[values(BackendKind::Ieee, BackendKind::Legacy, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.set(0, 7.5);
    ctx.set(1, 2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x21)]);
    assert_eq!(ctx.get(0), 1.5);
    assert_eq!((ctx.fpu.fpsr() >> 16) & 0xff, 3);
    assert_eq!(ctx.exceptions(), 0);
}

#[test]
fn frem_rounds_quotient_to_nearest() {
    let mut ctx = TestContext::default();
    ctx.set(0, 7.5);
    ctx.set(1, -2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x25)]);
    assert_eq!(ctx.get(0), -0.5);
    assert_eq!((ctx.fpu.fpsr() >> 16) & 0xff, 0x84, "negative quotient 4");
    assert_eq!(ctx.condition(), N);
}

#[test]
fn fmod_by_infinity_leaves_destination() {
    let mut ctx = TestContext::default();
    ctx.set(0, 5.0);
    ctx.set(1, f64::INFINITY);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x21)]);
    assert_eq!(ctx.get(0), 5.0);
    assert_eq!((ctx.fpu.fpsr() >> 16) & 0xff, 0);
}

#[rstest]
fn fmod_by_zero_clears_previous_quotient(
    #[values(BackendKind::Ieee, BackendKind::Legacy, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.set(0, 7.5);
    ctx.set(1, 2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x21)]);
    assert_eq!((ctx.fpu.fpsr() >> 16) & 0xff, 3);

    ctx.set(1, 0.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x21)]);
    assert!(ctx.get(0).is_nan());
    assert_eq!(ctx.exceptions() & OPERR, OPERR);
    assert_eq!((ctx.fpu.fpsr() >> 16) & 0xff, 0);
}

#[rstest]
#[case(0x00, 2.0)] // nearest, ties to even
#[case(0x10, 2.0)] // toward zero
#[case(0x20, 2.0)] // toward minus infinity
#[case(0x30, 3.0)] // toward plus infinity
fn fint_follows_fpcr_mode(#[case] fpcr: u32, #[case] expected: f64) {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(fpcr);
    ctx.set(1, 2.5);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x01)]);
    assert_eq!(ctx.get(0), expected);
    assert_eq!(ctx.exceptions(), INEX2);
}

#[test]
fn fintrz_ignores_fpcr_mode() {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(0x30);
    ctx.set(1, -2.75);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x03)]);
    assert_eq!(ctx.get(0), -2.0);
    assert_eq!(ctx.exceptions(), INEX2);
}

#[rstest]
fn exact_cancellation_toward_minus_infinity_is_negative_zero(
    #[values(BackendKind::Ieee, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.fpu.set_fpcr(0x20);
    ctx.set(0, 1.0);
    ctx.set(1, 1.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x28)]);
    assert_eq!(ctx.condition(), N | Z);
}

#[rstest]
fn double_precision_overflow(
    #[values(BackendKind::Ieee, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.fpu.set_fpcr(0x80);
    ctx.set(0, 1e300);
    ctx.set(1, 1e300);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x23)]);
    assert_eq!(ctx.get(0), f64::INFINITY);
    assert_eq!(ctx.exceptions(), OVFL | INEX2);
}

#[test]
fn single_precision_rounds_result() {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(0x40);
    ctx.set(0, 1.0);
    ctx.set(1, 3.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x20)]);
    assert_eq!(ctx.get(0), f64::from(1.0f32 / 3.0f32));
    assert_eq!(ctx.exceptions(), INEX2);
}

#[test]
fn fsdiv_rounds_to_single_on_68040() {
    let mut ctx = TestContext::new(BackendKind::Extended, FpuModel::Mc68040);
    ctx.set(0, 1.0);
    ctx.set(1, 3.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x60)]);
    assert_eq!(ctx.get(0), f64::from(1.0f32 / 3.0f32));
}

#[test]
fn fscale_multiplies_by_power_of_two() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.5);
    ctx.set(1, 3.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x26)]);
    assert_eq!(ctx.get(0), 12.0);
    assert_eq!(ctx.exceptions(), 0);
}

#[rstest]
fn fscale_past_storage_range_overflows(
    #[values(BackendKind::Ieee, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    ctx.fpu.set_fpcr(0x80);
    ctx.set(0, 1.0);
    ctx.set(1, 2000.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x26)]);
    assert_eq!(ctx.get(0), f64::INFINITY);
    assert_eq!(ctx.exceptions() & OVFL, OVFL);
    assert_eq!(ctx.condition(), INF);
}

#[test]
fn fsincos_writes_both_registers() {
    let mut ctx = TestContext::default();
    ctx.set(1, 0.0);
    ctx.exec(&[0xf200, reg_op(1, 3, 0x30 | 2)]);
    assert_eq!(ctx.get(3), 0.0);
    assert_eq!(ctx.get(2), 1.0);
    assert_eq!(ctx.condition(), Z);
}

#[test]
fn fcmp_sets_codes_without_writing() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    ctx.set(1, 2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x38)]);
    assert_eq!(ctx.get(0), 1.0);
    assert_eq!(ctx.condition(), N);
}

#[test]
fn fsqrt_of_negative_is_operand_error() {
    let mut ctx = TestContext::default();
    ctx.set(1, -4.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x04)]);
    assert!(ctx.get(0).is_nan());
    assert_eq!(ctx.exceptions(), OPERR);
}

#[test]
fn flogn_of_zero_is_minus_infinity() {
    let mut ctx = TestContext::default();
    ctx.set(1, 0.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x14)]);
    assert_eq!(ctx.get(0), f64::NEG_INFINITY);
    assert_eq!(ctx.exceptions(), DZ);
    assert_eq!(ctx.condition(), N | INF);
}

#[test]
fn enabled_exception_requests_trap_and_latches_fpiar() {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(0x0400);
    ctx.set(0, 1.0);
    ctx.set(1, 0.0);
    assert_eq!(ctx.run(&[0xf200, reg_op(1, 0, 0x20)]).expect("legal"), Completion::TrapPending(50));
    ctx.exec(&[0xf200, 0xa400]);
    assert_eq!(ctx.bus.d[0], crate::common::harness::CODE);
}
