//! Classification shared by every backend value type.

use std::fmt;

/// IEEE classification of a floating value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Class {
    /// Positive or negative zero.
    Zero,
    /// Nonzero value with magnitude below the smallest normal of its format.
    Subnormal,
    /// Normal finite value.
    Normal,
    /// Positive or negative infinity.
    Infinite,
    /// Not a number.
    Nan,
}

/// A numeric value held inside an FPU register by some backend.
///
/// Backends keep NaNs in the register tag rather than in the value, but a value type
/// may still be able to represent one (host doubles can); the engine treats a NaN value
/// returned from an arithmetic primitive as an invalid operation.
pub trait FpValue: Copy + fmt::Debug + PartialEq {
    /// Returns the IEEE classification.
    fn class(&self) -> Class;

    /// Returns the sign bit.
    fn is_sign_negative(&self) -> bool;

    /// Builds a signed zero.
    fn zero(negative: bool) -> Self;

    /// Builds a signed infinity.
    fn infinity(negative: bool) -> Self;

    /// Returns true for either zero.
    fn is_zero(&self) -> bool {
        self.class() == Class::Zero
    }

    /// Returns true for either infinity.
    fn is_infinite(&self) -> bool {
        self.class() == Class::Infinite
    }

    /// Returns true for NaN.
    fn is_nan(&self) -> bool {
        self.class() == Class::Nan
    }

    /// Returns true for finite nonzero values.
    fn is_regular(&self) -> bool {
        matches!(self.class(), Class::Normal | Class::Subnormal)
    }
}

impl FpValue for f64 {
    fn class(&self) -> Class {
        match self.classify() {
            std::num::FpCategory::Zero => Class::Zero,
            std::num::FpCategory::Subnormal => Class::Subnormal,
            std::num::FpCategory::Normal => Class::Normal,
            std::num::FpCategory::Infinite => Class::Infinite,
            std::num::FpCategory::Nan => Class::Nan,
        }
    }

    fn is_sign_negative(&self) -> bool {
        f64::is_sign_negative(*self)
    }

    fn zero(negative: bool) -> Self {
        if negative { -0.0 } else { 0.0 }
    }

    fn infinity(negative: bool) -> Self {
        if negative { f64::NEG_INFINITY } else { f64::INFINITY }
    }
}
