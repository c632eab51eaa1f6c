//! FPCR decoding.

use crate::float::{Format, RoundingMode, RoundingPrecision};

use super::status::ExceptionStatus;

/// The floating-point control register.
///
/// Bits 15:8 enable exception traps (same layout as [`ExceptionStatus`]), bits 7:6 select
/// rounding precision and bits 5:4 select the rounding mode. All other bits read as zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControlRegister(u32);

impl ControlRegister {
    /// Bits that hold state.
    pub const MASK: u32 = 0x0000_fff0;

    /// Decodes a guest-written FPCR value.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    /// Returns the stored FPCR value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns the rounding mode field.
    pub const fn mode(self) -> RoundingMode {
        RoundingMode::from_bits(self.0 >> 4)
    }

    /// Returns the rounding precision field.
    pub const fn precision(self) -> RoundingPrecision {
        RoundingPrecision::from_bits(self.0 >> 6)
    }

    /// Returns the exception enable byte.
    pub const fn enables(self) -> ExceptionStatus {
        ExceptionStatus::from_bits(self.0)
    }

    /// Returns the target format of ordinary arithmetic. Single and double precision
    /// narrow the exponent range along with the mantissa.
    pub const fn format(self) -> Format {
        Format::from_precision(self.precision())
    }
}
