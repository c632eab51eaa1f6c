//! # FMOVECR Tests

use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::TestContext;

const Z: u32 = 0x0400_0000;
const INEX2: u32 = 0x0200;

#[test]
fn offset_0f_is_positive_zero() {
    let mut ctx = TestContext::default();
    ctx.set(0, 7.0);
    ctx.exec(&[0xf200, 0x5c0f]);
    assert_eq!(ctx.get(0), 0.0);
    assert!(ctx.get(0).is_sign_positive());
    assert_eq!(ctx.condition(), Z);
}

#[rstest]
#[case(0x00, std::f64::consts::PI)]
#[case(0x0c, std::f64::consts::E)]
#[case(0x30, std::f64::consts::LN_2)]
#[case(0x31, std::f64::consts::LN_10)]
#[case(0x32, 1.0)]
#[case(0x34, 100.0)]
#[case(0x37, 1e16)]
fn rom_constants(#[case] offset: u16, #[case] expected: f64) {
    let mut ctx = TestContext::default();
    ctx.exec(&[0xf200, 0x5c00 | (3 << 7) | offset]);
    assert_eq!(ctx.get(3), expected);
}

#[test]
fn undefined_offset_reads_zero() {
    let mut ctx = TestContext::default();
    ctx.exec(&[0xf200, 0x5c00 | 0x20]);
    assert_eq!(ctx.get(0), 0.0);
    assert_eq!(ctx.condition(), Z);
}

#[test]
fn pi_rounded_to_single_is_inexact() {
    let mut ctx = TestContext::default();
    ctx.fpu.set_fpcr(0x40);
    ctx.exec(&[0xf200, 0x5c00]);
    assert_eq!(ctx.get(0), f64::from(std::f32::consts::PI));
    assert_eq!(ctx.exceptions(), INEX2);
}
