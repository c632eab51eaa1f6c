//! Floating-point conditional predicates and the instructions that test them.
//!
//! A predicate is five bits. The low four select one of sixteen relations over the
//! condition codes; bit 4 marks the IEEE-nonaware variant, which behaves identically
//! except that testing it while NaN is set raises BSUN.
//!
//! | Low bits | Aware / nonaware | True when                |
//! |----------|------------------|--------------------------|
//! | 0        | F / SF           | never                    |
//! | 1        | EQ / SEQ         | Z                        |
//! | 2        | OGT / GT         | !(NaN or Z or N)         |
//! | 3        | OGE / GE         | Z or !(NaN or N)         |
//! | 4        | OLT / LT         | N and !(NaN or Z)        |
//! | 5        | OLE / LE         | Z or (N and !NaN)        |
//! | 6        | OGL / GL         | !(NaN or Z)              |
//! | 7        | OR / GLE         | !NaN                     |
//! | 8        | UN / NGLE        | NaN                      |
//! | 9        | UEQ / NGL        | NaN or Z                 |
//! | 10       | UGT / NLE        | NaN or !(N or Z)         |
//! | 11       | UGE / NLT        | NaN or Z or !N           |
//! | 12       | ULT / NGE        | NaN or (N and !Z)        |
//! | 13       | ULE / NGT        | NaN or Z or N            |
//! | 14       | NE / SNE         | !Z                       |
//! | 15       | T / ST           | always                   |

use tracing::debug;

use crate::backend::FpuBackend;
use crate::common::{CpuBus, FpuResult};
use crate::state::{ConditionCodes, ExceptionStatus};

use super::operand::{self, Access, AddressingMode};
use super::{exceptions, Completion, Fpu, Illegal};

/// Predicate bit that marks the IEEE-nonaware variants.
pub const NONAWARE: u8 = 0x10;

/// Evaluates a predicate. Pure: BSUN handling is left to the caller.
pub fn evaluate(cc: ConditionCodes, predicate: u8) -> bool {
    let n = cc.contains(ConditionCodes::N);
    let z = cc.contains(ConditionCodes::Z);
    let nan = cc.contains(ConditionCodes::NAN);
    match predicate & 0xf {
        0 => false,
        1 => z,
        2 => !(nan || z || n),
        3 => z || !(nan || n),
        4 => n && !(nan || z),
        5 => z || (n && !nan),
        6 => !(nan || z),
        7 => !nan,
        8 => nan,
        9 => nan || z,
        10 => nan || !(n || z),
        11 => nan || z || !n,
        12 => nan || (n && !z),
        13 => nan || z || n,
        14 => !z,
        _ => true,
    }
}

impl<B: FpuBackend> Fpu<B> {
    /// Tests a predicate against the current condition codes, raising BSUN for a
    /// nonaware predicate on an unordered result.
    fn test_condition(&mut self, predicate: u16, instruction_address: u32) -> (bool, Completion) {
        let predicate = (predicate & 0x1f) as u8;
        let cc = self.context.fpsr.condition;
        let mut completion = Completion::Done;
        if predicate & NONAWARE != 0 && cc.contains(ConditionCodes::NAN) {
            self.context.fpsr.raise(ExceptionStatus::BSUN);
            completion = self.check_enabled(ExceptionStatus::BSUN, instruction_address);
        }
        let result = self.backend.test_predicate(cc, predicate);
        debug!(predicate, ?cc, result, "condition");
        (result, completion)
    }

    /// FBcc. `pc` is the address following the opcode word and `displacement` the
    /// already fetched 16- or 32-bit displacement (opcode bit 6 selects 32 bits).
    pub fn branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, pc: u32, displacement: u32) -> Completion {
        let (taken, completion) = self.test_condition(opcode, pc.wrapping_sub(2));
        if taken {
            let displacement = if opcode & 0x40 == 0 {
                displacement as u16 as i16 as u32
            } else {
                displacement
            };
            cpu.set_pc(pc.wrapping_add(displacement));
        }
        completion
    }

    /// FDBcc. The program counter points at the displacement word.
    pub fn decrement_and_branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> Completion {
        let pc = cpu.pc();
        let displacement = cpu.next_iword() as i16;
        let (holds, completion) = self.test_condition(extra, pc.wrapping_sub(4));
        if !holds {
            let reg = usize::from(opcode & 7);
            let value = cpu.d_reg(reg);
            let count = (value as u16).wrapping_sub(1);
            cpu.set_d_reg(reg, (value & !0xffff) | u32::from(count));
            if count != 0xffff {
                cpu.set_pc(pc.wrapping_add(i32::from(displacement) as u32));
            }
        }
        completion
    }

    /// FScc: writes `0xff` to a byte destination when the predicate holds, `0x00`
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FpuError::IllegalInstruction`] for non-alterable destinations.
    pub fn set_on_condition(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
    ) -> FpuResult<Completion> {
        let start = cpu.pc().wrapping_sub(4);
        self.with_rewind(cpu, opcode, extra, start, |fpu, cpu| {
            let mode = AddressingMode::decode(opcode);
            if let AddressingMode::DataDirect(reg) = mode {
                let (holds, completion) = fpu.test_condition(extra, start);
                let value = cpu.d_reg(reg);
                cpu.set_d_reg(reg, (value & !0xff) | if holds { 0xff } else { 0 });
                return Ok(completion);
            }
            let target = operand::memory_operand(cpu, mode, 1, Access::Write)?;
            let (holds, completion) = fpu.test_condition(extra, start);
            cpu.write_byte(target.addr, if holds { 0xff } else { 0 });
            target.commit(cpu);
            Ok(completion)
        })
    }

    /// FTRAPcc: consumes the optional operand and requests the TRAPcc vector when the
    /// predicate holds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FpuError::IllegalInstruction`] for a reserved operand mode.
    pub fn trap_on_condition(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
    ) -> FpuResult<Completion> {
        let start = cpu.pc().wrapping_sub(4);
        self.with_rewind(cpu, opcode, extra, start, |fpu, cpu| {
            match opcode & 7 {
                2 => {
                    let _ = cpu.next_iword();
                }
                3 => {
                    let _ = cpu.next_ilong();
                }
                4 => {}
                _ => return Err(Illegal),
            }
            let (holds, completion) = fpu.test_condition(extra, start);
            Ok(if holds { Completion::TrapPending(exceptions::TRAPCC_VECTOR) } else { completion })
        })
    }
}
