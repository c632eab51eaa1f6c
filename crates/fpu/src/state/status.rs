//! FPSR layout.
//!
//! The status register is four bytes, from most to least significant:
//!
//! | Bits  | Field             | Type                  |
//! |-------|-------------------|-----------------------|
//! | 27:24 | Condition codes   | [`ConditionCodes`]    |
//! | 23:16 | Quotient byte     | [`Quotient`]          |
//! | 15:8  | Exception status  | [`ExceptionStatus`]   |
//! | 7:3   | Accrued exception | [`AccruedExceptions`] |
//!
//! Writes from the guest are masked to `0x0fff_fff8`.

use crate::float::{Class, FpFlags, FpValue};

use super::register::FpuRegister;

status_bits! {
    /// Floating-point condition code byte (N, Z, I, NaN).
    ConditionCodes, mask = 0x0f00_0000;
    /// Negative.
    N = 0x0800_0000;
    /// Zero.
    Z = 0x0400_0000;
    /// Infinity.
    INF = 0x0200_0000;
    /// Not a number or unordered.
    NAN = 0x0100_0000;
}

status_bits! {
    /// Exception status byte: the exceptions raised by the most recent instruction.
    ExceptionStatus, mask = 0x0000_ff00;
    /// Branch/set on unordered.
    BSUN = 0x8000;
    /// Signaling NaN operand.
    SNAN = 0x4000;
    /// Operand error.
    OPERR = 0x2000;
    /// Overflow.
    OVFL = 0x1000;
    /// Underflow.
    UNFL = 0x0800;
    /// Divide by zero.
    DZ = 0x0400;
    /// Inexact operation.
    INEX2 = 0x0200;
    /// Inexact decimal input.
    INEX1 = 0x0100;
}

status_bits! {
    /// Accrued exception byte: sticky summary of every exception since it was last cleared.
    AccruedExceptions, mask = 0x0000_00f8;
    /// Invalid operation.
    IOP = 0x80;
    /// Overflow.
    OVFL = 0x40;
    /// Underflow.
    UNFL = 0x20;
    /// Divide by zero.
    DZ = 0x10;
    /// Inexact.
    INEX = 0x08;
}

impl ConditionCodes {
    /// Computes the condition codes of a value: N from the sign, then exactly one of
    /// NaN, Z or I where applicable.
    pub fn of<V: FpValue>(register: &FpuRegister<V>) -> Self {
        match register {
            FpuRegister::NaN { negative, .. } => Self::when(*negative, Self::N) | Self::NAN,
            FpuRegister::Number(value) => {
                let class = match value.class() {
                    Class::Zero => Self::Z,
                    Class::Infinite => Self::INF,
                    Class::Nan => Self::NAN,
                    Class::Normal | Class::Subnormal => Self::NONE,
                };
                Self::when(value.is_sign_negative(), Self::N) | class
            }
        }
    }

    /// Returns the 4-bit condition nibble (N Z I NaN) as used by predicate tables.
    pub const fn nibble(self) -> usize {
        (self.0 >> 24) as usize
    }

    /// Builds condition codes from a 4-bit nibble.
    pub const fn from_nibble(nibble: usize) -> Self {
        Self::from_bits((nibble as u32 & 0xf) << 24)
    }
}

impl From<FpFlags> for ExceptionStatus {
    fn from(flags: FpFlags) -> Self {
        Self::when(flags.contains(FpFlags::NV), Self::OPERR)
            | Self::when(flags.contains(FpFlags::DZ), Self::DZ)
            | Self::when(flags.contains(FpFlags::OF), Self::OVFL)
            | Self::when(flags.contains(FpFlags::UF), Self::UNFL)
            | Self::when(flags.contains(FpFlags::NX), Self::INEX2)
    }
}

impl ExceptionStatus {
    /// Derives the accrued bits implied by this exception byte.
    ///
    /// Underflow accrues only together with an inexact result; overflow always accrues
    /// an inexact as well.
    pub const fn accrued(self) -> AccruedExceptions {
        let mut bits = 0;
        if self.intersects(Self(Self::BSUN.0 | Self::SNAN.0 | Self::OPERR.0)) {
            bits |= AccruedExceptions::IOP.0;
        }
        if self.contains(Self::OVFL) {
            bits |= AccruedExceptions::OVFL.0;
        }
        if self.contains(Self(Self::UNFL.0 | Self::INEX2.0)) {
            bits |= AccruedExceptions::UNFL.0;
        }
        if self.contains(Self::DZ) {
            bits |= AccruedExceptions::DZ.0;
        }
        if self.intersects(Self(Self::INEX1.0 | Self::INEX2.0 | Self::OVFL.0)) {
            bits |= AccruedExceptions::INEX.0;
        }
        AccruedExceptions(bits)
    }
}

/// Quotient byte written by FMOD and FREM: sign in bit 7, low seven quotient bits below.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Quotient {
    /// Sign of the quotient (XOR of the operand signs).
    pub negative: bool,
    /// Low seven bits of the quotient magnitude.
    pub low_bits: u8,
}

impl Quotient {
    /// Builds a quotient byte, keeping only the low seven magnitude bits.
    pub const fn new(negative: bool, low_bits: u8) -> Self {
        Self { negative, low_bits: low_bits & 0x7f }
    }

    /// Returns the quotient byte in its FPSR position (bits 23:16).
    pub const fn bits(self) -> u32 {
        ((self.negative as u32) << 23) | ((self.low_bits as u32) << 16)
    }

    /// Decodes the quotient byte from raw FPSR bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self::new(bits & 0x0080_0000 != 0, (bits >> 16) as u8)
    }
}

/// The floating-point status register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StatusRegister {
    /// Condition codes of the last result.
    pub condition: ConditionCodes,
    /// Quotient byte of the last FMOD/FREM.
    pub quotient: Quotient,
    /// Exceptions raised by the last instruction.
    pub exceptions: ExceptionStatus,
    /// Sticky exception summary.
    pub accrued: AccruedExceptions,
}

impl StatusRegister {
    /// Bits a guest may write.
    pub const WRITE_MASK: u32 = 0x0fff_fff8;

    /// Decodes a guest-written FPSR value.
    pub const fn from_bits(bits: u32) -> Self {
        let bits = bits & Self::WRITE_MASK;
        Self {
            condition: ConditionCodes::from_bits(bits),
            quotient: Quotient::from_bits(bits),
            exceptions: ExceptionStatus::from_bits(bits),
            accrued: AccruedExceptions::from_bits(bits),
        }
    }

    /// Returns the packed 32-bit FPSR value.
    pub const fn bits(self) -> u32 {
        self.condition.bits() | self.quotient.bits() | self.exceptions.bits() | self.accrued.bits()
    }

    /// Replaces the exception byte with the exceptions of the current instruction and
    /// ORs the implied bits into the accrued byte.
    pub fn record(&mut self, exceptions: ExceptionStatus) {
        self.exceptions = exceptions;
        self.accrued |= exceptions.accrued();
    }

    /// Adds exceptions to the current instruction's byte and accrues them.
    pub fn raise(&mut self, exceptions: ExceptionStatus) {
        self.record(self.exceptions | exceptions);
    }
}
