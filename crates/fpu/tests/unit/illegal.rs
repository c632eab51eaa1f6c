//! # Illegal Instruction Tests
//!
//! Every illegal encoding rewinds the program counter to the opcode word and leaves
//! the register file untouched.

use m68k_fpu::{BackendKind, FpuError, FpuModel};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{CODE, TestContext, mem_op, reg_op};

#[rstest]
#[case::class_one(&[0xf200, 0x2000])]
#[case::reserved_opmode(&[0xf200, reg_op(1, 0, 0x29)])]
#[case::packed_immediate_source(&[0xf23c, mem_op(3, 0, 0x00)])]
#[case::address_register_source(&[0xf208, mem_op(0, 0, 0x00)])]
#[case::address_register_destination(&[0xf208, 0x6000])]
#[case::double_to_data_register(&[0xf200, 0x6000 | (5 << 10)])]
fn illegal_encodings_rewind(#[case] words: &[u16]) {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.0);
    ctx.bus.a[0] = 0x2000;
    let fpsr = ctx.fpu.fpsr();
    let err = ctx.run(words).expect_err("illegal");
    assert!(matches!(err, FpuError::IllegalInstruction { opcode, extra } if opcode == words[0] && extra == words[1]));
    assert_eq!(ctx.bus.pc, CODE);
    assert_eq!(ctx.get(0), 1.0);
    assert_eq!(ctx.fpu.fpsr(), fpsr);
}

#[test]
fn single_rounding_ops_need_68040() {
    let mut ctx = TestContext::new(BackendKind::Ieee, FpuModel::Mc68881);
    assert!(ctx.run(&[0xf200, reg_op(1, 0, 0x62)]).is_err());
    let mut ctx = TestContext::new(BackendKind::Ieee, FpuModel::Mc68040);
    ctx.set(0, 1.0);
    ctx.set(1, 2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x62)]);
    assert_eq!(ctx.get(0), 3.0);
}

#[test]
fn sglmul_is_legal_on_68881() {
    let mut ctx = TestContext::default();
    ctx.set(0, 1.5);
    ctx.set(1, 2.0);
    ctx.exec(&[0xf200, reg_op(1, 0, 0x27)]);
    assert_eq!(ctx.get(0), 3.0);
}
