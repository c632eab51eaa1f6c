//! Rounding control types.
//!
//! The 68881 selects rounding with two FPCR fields:
//! 1. **Mode** (bits 5:4): to nearest, toward zero, toward minus infinity, toward plus infinity.
//! 2. **Precision** (bits 7:6): extended, single or double mantissa width.
//!
//! Single and double precision round to the full IEEE format, mantissa width and exponent
//! range together, as do the 68040 FS*/FD* instructions. Only FSGLMUL/FSGLDIV keep the
//! extended exponent range with a 24-bit mantissa; every target is a
//! [`Format`](super::soft::Format).

use rustc_apfloat::Round;

/// Rounding direction (FPCR bits 5:4).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to nearest, ties to even (RN).
    #[default]
    Nearest = 0,
    /// Round toward zero (RZ).
    Zero = 1,
    /// Round toward minus infinity (RM).
    Minus = 2,
    /// Round toward plus infinity (RP).
    Plus = 3,
}

impl RoundingMode {
    /// Decodes the 2-bit mode field.
    ///
    /// # Arguments
    ///
    /// * `bits` - The mode field, already shifted down to bits 1:0.
    ///
    /// # Returns
    ///
    /// The rounding mode. Every 2-bit value is defined, so this never fails.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            0 => Self::Nearest,
            1 => Self::Zero,
            2 => Self::Minus,
            _ => Self::Plus,
        }
    }

    /// Returns true if rounding a value of the given sign moves it away from zero
    /// whenever any discarded bit is set.
    pub const fn rounds_away(self, negative: bool) -> bool {
        match self {
            Self::Nearest | Self::Zero => false,
            Self::Minus => negative,
            Self::Plus => !negative,
        }
    }

    /// Returns true if an overflowing result of the given sign becomes infinity
    /// rather than the largest finite value.
    pub const fn overflows_to_infinity(self, negative: bool) -> bool {
        match self {
            Self::Nearest => true,
            Self::Zero => false,
            Self::Minus => negative,
            Self::Plus => !negative,
        }
    }
}

impl From<RoundingMode> for Round {
    fn from(mode: RoundingMode) -> Self {
        match mode {
            RoundingMode::Nearest => Self::NearestTiesToEven,
            RoundingMode::Zero => Self::TowardZero,
            RoundingMode::Minus => Self::TowardNegative,
            RoundingMode::Plus => Self::TowardPositive,
        }
    }
}

/// Rounding precision (FPCR bits 7:6).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RoundingPrecision {
    /// 64-bit mantissa.
    #[default]
    Extended = 0,
    /// 24-bit mantissa.
    Single = 1,
    /// 53-bit mantissa.
    Double = 2,
}

impl RoundingPrecision {
    /// Decodes the 2-bit precision field. The reserved encoding `11` behaves as extended.
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 3 {
            1 => Self::Single,
            2 => Self::Double,
            _ => Self::Extended,
        }
    }
}
