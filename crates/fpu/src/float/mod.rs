//! Floating-point primitives shared by the codec and the backends.
//!
//! This module provides:
//! 1. **Flags:** IEEE exception flags reported by software arithmetic.
//! 2. **Rounding:** FPCR rounding mode and precision types.
//! 3. **Values:** The `FpValue` classification trait implemented by every backend value.
//! 4. **Soft Float:** An exact extended-precision software float with single-point rounding.
//! 5. **Decimal:** Exact binary/decimal conversion for packed operands.

/// Exact binary/decimal conversion.
pub mod decimal;

/// IEEE exception flags.
pub mod flags;

/// Rounding mode and precision.
pub mod rounding;

/// Software extended-precision float.
pub mod soft;

/// Value classification trait.
pub mod value;

pub use flags::FpFlags;
pub use rounding::{RoundingMode, RoundingPrecision};
pub use soft::{Format, RemainderKind, SoftFloat};
pub use value::{Class, FpValue};
