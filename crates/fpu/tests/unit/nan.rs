//! # NaN Handling Tests
//!
//! Payload preservation, signaling NaN quieting and condition codes of NaN results.

use m68k_fpu::{BackendKind, FpuModel, FpuRegister};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use crate::common::harness::{TestContext, reg_op};

const QUIET: u64 = 1 << 62;
const SNAN: u32 = 0x4000;
const NAN_CC: u32 = 0x0100_0000;
const Z: u32 = 0x0400_0000;

#[rstest]
fn register_move_keeps_quiet_payload(
    #[values(BackendKind::Ieee, BackendKind::Legacy, BackendKind::Native, BackendKind::Extended)] backend: BackendKind,
) {
    let mut ctx = TestContext::new(backend, FpuModel::Mc68881);
    let payload = 0xc000_1234_5678_9abc;
    ctx.set_nan(1, payload, true);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x00)]);
    assert_eq!(ctx.fpu.register(0), FpuRegister::NaN { payload, negative: true });
    assert_eq!(ctx.exceptions(), 0);
}

#[test]
fn signaling_nan_is_quieted() {
    let mut ctx = TestContext::default();
    let payload = 0x8000_0000_0000_0001;
    ctx.set_nan(1, payload, false);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x00)]);
    assert_eq!(ctx.fpu.register(0), FpuRegister::NaN { payload: payload | QUIET, negative: false });
    assert_eq!(ctx.exceptions(), SNAN);
    assert_eq!(ctx.fpu.fpsr() & 0x80, 0x80, "accrued IOP");
}

#[test]
fn destination_nan_wins() {
    let mut ctx = TestContext::default();
    ctx.set_nan(0, 0xc000_0000_0000_00aa, false);
    ctx.set_nan(1, 0xc000_0000_0000_00bb, false);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x22)]);
    assert_eq!(ctx.fpu.register(0), FpuRegister::NaN { payload: 0xc000_0000_0000_00aa, negative: false });
}

#[test]
fn source_nan_propagates_into_number() {
    let mut ctx = TestContext::default();
    ctx.set(0, 2.0);
    ctx.set_nan(1, 0xc000_0000_0000_00bb, true);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x23)]);
    assert_eq!(ctx.fpu.register(0), FpuRegister::NaN { payload: 0xc000_0000_0000_00bb, negative: true });
}

#[test]
fn fneg_flips_nan_sign() {
    let mut ctx = TestContext::default();
    ctx.set_nan(1, u64::MAX, false);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x1a)]);
    assert_eq!(ctx.fpu.register(0), FpuRegister::NaN { payload: u64::MAX, negative: true });
    assert_eq!(ctx.condition(), 0x0800_0000 | NAN_CC);
}

#[test]
fn reset_fills_registers_with_default_nan() {
    let mut ctx = TestContext::default();
    ctx.set(4, 1.0);
    ctx.fpu.reset();
    for i in 0..8 {
        assert_eq!(ctx.fpu.register(i), FpuRegister::default_nan());
    }
    assert_eq!(ctx.fpu.fpcr(), 0);
    assert_eq!(ctx.fpu.fpsr(), 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn nan_never_reports_zero(payload in 1u64.., negative: bool) {
        let mut ctx = TestContext::default();
        ctx.set_nan(1, payload, negative);
        ctx.exec(&[0xf200, reg_op(1, 0, 0x3a)]);
        prop_assert_eq!(ctx.condition() & (NAN_CC | Z), NAN_CC);
    }
}
