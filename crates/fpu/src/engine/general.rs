//! General arithmetic (classes 0 and 2) and FMOVECR.
//!
//! Special operands are resolved here, before any backend call, so every backend shares
//! one policy:
//!
//! | Case                                      | Result                     |
//! |-------------------------------------------|----------------------------|
//! | NaN operand                               | Destination NaN, else source NaN |
//! | FSQRT of a negative                       | NaN, OPERR                 |
//! | FLOGN/FLOG10/FLOG2 of zero                | -inf, DZ                   |
//! | FLOGN/FLOG10/FLOG2 of a negative          | NaN, OPERR                 |
//! | FLOGNP1 of -1 / below -1                  | -inf, DZ / NaN, OPERR      |
//! | FASIN, FACOS, FATANH with \|x\| > 1       | NaN, OPERR                 |
//! | FATANH of +-1                             | +-inf, DZ                  |
//! | FSIN, FCOS, FTAN, FSINCOS, FGETEXP, FGETMAN of inf | NaN, OPERR        |
//! | x / 0                                     | inf, DZ                    |
//! | 0 / 0, inf / inf, 0 * inf, inf - inf      | NaN, OPERR                 |
//!
//! A backend that still produces a NaN value yields the default NaN and OPERR.

use std::cmp::Ordering;

use tracing::trace;

use crate::backend::{Control, Dyadic, FpuBackend, Monadic, Outcome};
use crate::codec::{self, OperandFormat};
use crate::common::CpuBus;
use crate::float::{Format, FpValue, RemainderKind, RoundingMode, SoftFloat};
use crate::state::{ConditionCodes, ExceptionStatus, FpuRegister, Quotient};

use super::dispatch::{GeneralOp, OpDescriptor, Rounding};
use super::operand::{self, Access, AddressingMode};
use super::{Completion, Fpu, Illegal};

/// Largest FSCALE factor magnitude that is applied literally.
const SCALE_LIMIT: i64 = 1 << 14;

/// A register result with the exceptions that produced it.
type Produced<V> = (FpuRegister<V>, ExceptionStatus);

const fn operr<V>() -> Produced<V> {
    (FpuRegister::default_nan(), ExceptionStatus::OPERR)
}

impl<B: FpuBackend> Fpu<B> {
    /// Executes a class 0/2 instruction.
    pub(super) fn general(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
        instruction_address: u32,
    ) -> Result<Completion, Illegal> {
        let dst = usize::from((extra >> 7) & 7);
        if extra & 0xfc00 == 0x5c00 {
            return Ok(self.move_constant(dst, (extra & 0x7f) as u8, instruction_address));
        }
        let desc = self.dispatch.lookup(extra & 0x7f, self.context.is_integral).ok_or(Illegal)?;
        self.backend.set_control(self.control_for(desc.rounding));
        let (src, load_exceptions) = self.load_source(cpu, opcode, extra)?;
        trace!(?desc, ?src, dst, "general operation");
        let exceptions = load_exceptions | self.perform(desc, dst, src, usize::from(extra & 7));
        Ok(self.complete(exceptions, instruction_address))
    }

    /// Rounding controls for an operation.
    fn control_for(&self, rounding: Rounding) -> Control {
        let fpcr = self.context.fpcr;
        let format = match rounding {
            Rounding::Fpcr => fpcr.format(),
            Rounding::Single => Format::SINGLE,
            Rounding::Double => Format::DOUBLE,
            Rounding::SingleMantissa => Format::SINGLE_MANTISSA,
        };
        Control { mode: fpcr.mode(), format }
    }

    /// Loads the source operand selected by extension word bits 14:10.
    ///
    /// Signaling NaN sources raise SNAN and are used quieted.
    fn load_source(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
    ) -> Result<(FpuRegister<B::Value>, ExceptionStatus), Illegal> {
        let selector = (extra >> 10) & 7;
        if extra & 0x4000 == 0 {
            let register = self.context.registers[usize::from(selector)];
            let snan = ExceptionStatus::when(register.is_signaling(), ExceptionStatus::SNAN);
            return Ok((register.quieted(), snan));
        }

        let format = OperandFormat::from_size(selector);
        if format == OperandFormat::PackedDynamic {
            return Err(Illegal);
        }
        let mode = AddressingMode::decode(opcode);
        let words = match mode {
            AddressingMode::DataDirect(reg) => operand::read_data_register(cpu, reg, format)?,
            AddressingMode::AddressDirect(_) => return Err(Illegal),
            AddressingMode::Immediate if format.is_packed() => return Err(Illegal),
            _ => {
                let source = operand::memory_operand(cpu, mode, format.byte_len(), Access::Read)?;
                let words = operand::read_words(cpu, source.addr, format);
                source.commit(cpu);
                words
            }
        };
        let decoded = codec::decode(format, words);
        if self.tracing_operands() {
            trace!(?format, ?words, register = ?decoded.register, "source operand");
        }
        Ok((self.import(decoded.register), decoded.exceptions))
    }

    /// Runs a decoded operation and stores its result. Returns the raised exceptions.
    fn perform(
        &mut self,
        desc: OpDescriptor,
        dst: usize,
        src: FpuRegister<B::Value>,
        cos_dst: usize,
    ) -> ExceptionStatus {
        let dest = self.context.registers[dst];
        match desc.op {
            GeneralOp::Monadic(op) => {
                let (result, exceptions) = self.monadic(op, src);
                let exceptions = match op {
                    // FINT and FINTRZ report inexactness only.
                    Monadic::Int | Monadic::IntRz => exceptions & ExceptionStatus::INEX2,
                    _ => exceptions,
                };
                self.store(dst, result);
                exceptions
            }
            GeneralOp::Dyadic(op) => {
                let (result, exceptions) = self.dyadic(op, dest, src);
                self.store(dst, result);
                exceptions
            }
            GeneralOp::Remainder(kind) => {
                let (result, exceptions) = self.remainder(kind, dest, src);
                self.store(dst, result);
                exceptions
            }
            GeneralOp::Scale => {
                let (result, exceptions) = self.scale(dest, src);
                self.store(dst, result);
                exceptions
            }
            GeneralOp::SinCos => {
                let (sine, sin_exceptions) = self.monadic(Monadic::Sin, src);
                let (cosine, cos_exceptions) = self.monadic(Monadic::Cos, src);
                if cos_dst != dst {
                    self.context.registers[cos_dst] = cosine;
                }
                self.store(dst, sine);
                sin_exceptions | cos_exceptions
            }
            GeneralOp::Compare => {
                self.context.fpsr.condition = self.compare(dest, src);
                ExceptionStatus::NONE
            }
            GeneralOp::Test => {
                self.context.fpsr.condition = self.backend.condition_codes(&src);
                ExceptionStatus::NONE
            }
        }
    }

    /// Writes a result register and sets the condition codes from it.
    fn store(&mut self, dst: usize, result: FpuRegister<B::Value>) {
        self.context.registers[dst] = result;
        self.context.fpsr.condition = self.backend.condition_codes(&result);
    }

    /// Converts a backend outcome into a register, mapping NaN values to the default NaN.
    fn settle(outcome: Outcome<B::Value>) -> Produced<B::Value> {
        if outcome.value.is_nan() {
            return (FpuRegister::default_nan(), outcome.status | ExceptionStatus::OPERR);
        }
        (FpuRegister::Number(outcome.value), outcome.status)
    }

    fn constant(&self, value: i64) -> B::Value {
        self.backend.import(SoftFloat::from_i64(value))
    }

    /// Single-operand operations.
    fn monadic(&mut self, op: Monadic, src: FpuRegister<B::Value>) -> Produced<B::Value> {
        let x = match src {
            FpuRegister::NaN { negative, .. } => {
                let result = match op {
                    Monadic::Abs => src.with_nan_sign(false),
                    Monadic::Neg => src.with_nan_sign(!negative),
                    _ => src,
                };
                return (result, ExceptionStatus::NONE);
            }
            FpuRegister::Number(x) => x,
        };
        let negative = x.is_sign_negative();
        let magnitude = self.backend.compare(x, self.constant(if negative { -1 } else { 1 }));
        let beyond_one = matches!(
            (negative, magnitude),
            (false, Some(Ordering::Greater)) | (true, Some(Ordering::Less))
        );
        let is_one = magnitude == Some(Ordering::Equal);
        match op {
            Monadic::Sqrt if negative && !x.is_zero() => return operr(),
            Monadic::LogN | Monadic::Log10 | Monadic::Log2 if x.is_zero() => {
                return (FpuRegister::Number(B::Value::infinity(true)), ExceptionStatus::DZ);
            }
            Monadic::LogN | Monadic::Log10 | Monadic::Log2 if negative => return operr(),
            Monadic::LogNp1 if negative && is_one => {
                return (FpuRegister::Number(B::Value::infinity(true)), ExceptionStatus::DZ);
            }
            Monadic::LogNp1 if negative && beyond_one => return operr(),
            Monadic::Asin | Monadic::Acos | Monadic::Atanh if beyond_one => return operr(),
            Monadic::Atanh if is_one => {
                return (FpuRegister::Number(B::Value::infinity(negative)), ExceptionStatus::DZ);
            }
            Monadic::Sin | Monadic::Cos | Monadic::Tan | Monadic::GetExp | Monadic::GetMan
                if x.is_infinite() =>
            {
                return operr();
            }
            Monadic::GetExp | Monadic::GetMan if x.is_zero() => {
                return (src, ExceptionStatus::NONE);
            }
            _ => {}
        }
        Self::settle(self.backend.monadic(op, x))
    }

    /// Two-operand arithmetic.
    fn dyadic(
        &mut self,
        op: Dyadic,
        dest: FpuRegister<B::Value>,
        src: FpuRegister<B::Value>,
    ) -> Produced<B::Value> {
        let (a, b) = match (dest, src) {
            (FpuRegister::NaN { .. }, _) => return (dest.quieted(), ExceptionStatus::NONE),
            (_, FpuRegister::NaN { .. }) => return (src, ExceptionStatus::NONE),
            (FpuRegister::Number(a), FpuRegister::Number(b)) => (a, b),
        };
        let opposite = a.is_sign_negative() != b.is_sign_negative();
        let both_infinite = a.is_infinite() && b.is_infinite();
        match op {
            Dyadic::Div if b.is_zero() && a.is_zero() => return operr(),
            Dyadic::Div if b.is_zero() && !a.is_infinite() => {
                return (FpuRegister::Number(B::Value::infinity(opposite)), ExceptionStatus::DZ);
            }
            Dyadic::Div if both_infinite => return operr(),
            Dyadic::Add if both_infinite && opposite => return operr(),
            Dyadic::Sub if both_infinite && !opposite => return operr(),
            Dyadic::Mul if (a.is_zero() && b.is_infinite()) || (a.is_infinite() && b.is_zero()) => {
                return operr();
            }
            _ => {}
        }
        Self::settle(self.backend.dyadic(op, a, b))
    }

    /// FMOD and FREM. Writes the quotient byte.
    fn remainder(
        &mut self,
        kind: RemainderKind,
        dest: FpuRegister<B::Value>,
        src: FpuRegister<B::Value>,
    ) -> Produced<B::Value> {
        let (a, b) = match (dest, src) {
            (FpuRegister::NaN { .. }, _) => return (dest.quieted(), ExceptionStatus::NONE),
            (_, FpuRegister::NaN { .. }) => return (src, ExceptionStatus::NONE),
            (FpuRegister::Number(a), FpuRegister::Number(b)) => (a, b),
        };
        if b.is_zero() || a.is_infinite() {
            self.context.fpsr.quotient = Quotient::default();
            return operr();
        }
        if a.is_zero() || b.is_infinite() {
            self.context.fpsr.quotient = Quotient::default();
            return (dest, ExceptionStatus::NONE);
        }
        let (outcome, low_bits) = self.backend.remainder(a, b, kind);
        let negative = a.is_sign_negative() != b.is_sign_negative();
        self.context.fpsr.quotient = Quotient::new(negative, low_bits);
        Self::settle(outcome)
    }

    /// FSCALE: multiplies the destination by two to the integer part of the source.
    fn scale(&mut self, dest: FpuRegister<B::Value>, src: FpuRegister<B::Value>) -> Produced<B::Value> {
        let (a, factor) = match (dest, src) {
            (FpuRegister::NaN { .. }, _) => return (dest.quieted(), ExceptionStatus::NONE),
            (_, FpuRegister::NaN { .. }) => return (src, ExceptionStatus::NONE),
            (FpuRegister::Number(a), FpuRegister::Number(b)) => (a, b),
        };
        if factor.is_infinite() {
            return operr();
        }
        let downward = factor.is_sign_negative();
        if a.is_infinite() {
            let flag = if downward { ExceptionStatus::UNFL } else { ExceptionStatus::OVFL };
            return (dest, flag);
        }
        let (n, _) = self.backend.export(factor).to_integer(RoundingMode::Zero, i64::MIN, i64::MAX);
        // Beyond 2^14 every finite operand over- or underflows; a factor past the
        // extended range in either direction gives the same result.
        let n = n.clamp(-4 * SCALE_LIMIT, 4 * SCALE_LIMIT) as i32;
        Self::settle(self.backend.scale(a, n))
    }

    /// FCMP condition codes for `dest - src`.
    fn compare(&self, dest: FpuRegister<B::Value>, src: FpuRegister<B::Value>) -> ConditionCodes {
        let (FpuRegister::Number(a), FpuRegister::Number(b)) = (dest, src) else {
            return ConditionCodes::NAN;
        };
        match self.backend.compare(a, b) {
            None => ConditionCodes::NAN,
            Some(Ordering::Less) => ConditionCodes::N,
            Some(Ordering::Greater) => ConditionCodes::NONE,
            Some(Ordering::Equal) => {
                let signed = a.is_sign_negative() && (a.is_zero() || a.is_infinite());
                ConditionCodes::Z | ConditionCodes::when(signed, ConditionCodes::N)
            }
        }
    }

    /// FMOVECR: loads a ROM constant rounded to the FPCR precision.
    fn move_constant(&mut self, dst: usize, offset: u8, instruction_address: u32) -> Completion {
        self.apply_fpcr();
        let value = self.backend.import(self.rom.get(offset));
        let (result, exceptions) = Self::settle(self.backend.monadic(Monadic::Move, value));
        trace!(offset, ?result, dst, "FMOVECR");
        self.store(dst, result);
        self.complete(exceptions, instruction_address)
    }
}
