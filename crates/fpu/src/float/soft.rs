//! Extended-precision software float on top of `rustc_apfloat`.
//!
//! [`SoftFloat`] stores its value in an IEEE quad ([`Quad`]), which holds every 68881
//! extended value exactly, including the extended denormals one binade below the x87
//! range. It provides:
//! 1. **Exact Conversions:** From host doubles, integers and the wire formats.
//! 2. **Correct Rounding:** Every operation is evaluated in quad toward zero with the
//!    inexact flag folded into the last bit (round to odd), then rounded once into a
//!    [`Format`] through the `rustc_apfloat` type with that mantissa width.
//! 3. **Arithmetic:** Add, multiply, divide, square root, remainder with quotient bits,
//!    scaling and round-to-integral.
//!
//! The exponent range is passed with every call instead of being process-wide state, so
//! two formats can be used back to back without save/restore.

use std::cmp::Ordering;
use std::fmt;

use rustc_apfloat::ieee::{Double, Quad, Single, X87DoubleExtended};
use rustc_apfloat::{ExpInt, Float, FloatConvert, Round, Status, StatusAnd};

use super::flags::FpFlags;
use super::rounding::{RoundingMode, RoundingPrecision};
use super::value::{Class, FpValue};

/// Target precision and exponent range for a rounding step.
///
/// `emin` is the exponent of the smallest value that keeps full precision; anything
/// below it is denormalized (gradual underflow). `emax` is the exponent of the largest
/// finite value. The precision selects the `rustc_apfloat` type that rounds the
/// mantissa: 24 bits rounds as [`Single`], 53 as [`Double`], anything else as
/// [`X87DoubleExtended`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Format {
    /// Mantissa width in bits, including the integer bit.
    pub precision: u32,
    /// Smallest exponent of a full-precision value.
    pub emin: i32,
    /// Largest exponent of a finite value.
    pub emax: i32,
}

impl Format {
    /// IEEE single precision.
    pub const SINGLE: Self = Self { precision: 24, emin: -126, emax: 127 };
    /// IEEE double precision.
    pub const DOUBLE: Self = Self { precision: 53, emin: -1022, emax: 1023 };
    /// 68881 extended precision. Biased exponent zero still carries an explicit
    /// integer bit, so the full-precision range reaches down to 2^-16383.
    pub const EXTENDED: Self = Self { precision: 64, emin: -16383, emax: 16383 };
    /// 24-bit mantissa over the extended exponent range (FSGLMUL, FSGLDIV).
    pub const SINGLE_MANTISSA: Self = Self { precision: 24, ..Self::EXTENDED };

    /// Format selected by the FPCR rounding precision: mantissa width and exponent
    /// range of the named IEEE format.
    pub const fn from_precision(precision: RoundingPrecision) -> Self {
        match precision {
            RoundingPrecision::Extended => Self::EXTENDED,
            RoundingPrecision::Single => Self::SINGLE,
            RoundingPrecision::Double => Self::DOUBLE,
        }
    }

    /// The narrower of two formats: the smaller mantissa and the overlap of the ranges.
    pub const fn within(self, other: Self) -> Self {
        Self {
            precision: if self.precision < other.precision { self.precision } else { other.precision },
            emin: if self.emin > other.emin { self.emin } else { other.emin },
            emax: if self.emax < other.emax { self.emax } else { other.emax },
        }
    }
}

/// Remainder flavour for [`SoftFloat::remainder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemainderKind {
    /// Quotient truncated toward zero (FMOD).
    Truncated,
    /// Quotient rounded to nearest, ties to even (FREM, IEEE remainder).
    Nearest,
}

/// Software extended-precision value.
///
/// Equality is bitwise: `+0` and `-0` differ. Use [`SoftFloat::compare`] for numeric
/// ordering.
#[derive(Clone, Copy)]
pub struct SoftFloat(Quad);

impl PartialEq for SoftFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl fmt::Debug for SoftFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative() { "-" } else { "+" };
        match self.exponent() {
            Some(exp) => write!(f, "{sign}{:#018x}p{exp}", self.significand()),
            None if self.0.is_nan() => write!(f, "nan"),
            None if self.0.is_infinite() => write!(f, "{sign}inf"),
            None => write!(f, "{sign}0"),
        }
    }
}

impl Default for SoftFloat {
    fn default() -> Self {
        Self::zero(false)
    }
}

/// Folds an inexact quad result into its last bit so one later rounding is exact.
fn round_to_odd(StatusAnd { status, value }: StatusAnd<Quad>) -> Quad {
    if status.contains(Status::INEXACT) && !value.is_nan() {
        Quad::from_bits(value.to_bits() | 1)
    } else {
        value
    }
}

fn exponent_of(value: Quad) -> i32 {
    i32::from(value.ilogb())
}

impl SoftFloat {
    /// Signed zero.
    pub fn zero(negative: bool) -> Self {
        Self(Quad::ZERO).with_sign(negative)
    }

    /// Signed infinity.
    pub fn infinity(negative: bool) -> Self {
        Self(Quad::INFINITY).with_sign(negative)
    }

    /// An unspecified NaN. Payloads live in the register tag, not here.
    pub fn nan() -> Self {
        Self(Quad::NAN)
    }

    /// Builds `sig * 2^(exp - 63)`.
    pub fn from_parts(negative: bool, exp: i32, sig: u64) -> Self {
        Self::from_scaled(negative, sig, exp - 63)
    }

    /// Builds `mantissa * 2^scale` exactly.
    pub fn from_scaled(negative: bool, mantissa: u64, scale: i32) -> Self {
        let magnitude = Quad::from_u128(u128::from(mantissa)).value.scalbn(scale as ExpInt);
        Self(magnitude).with_sign(negative)
    }

    /// Converts a signed integer exactly.
    pub fn from_i64(value: i64) -> Self {
        Self(Quad::from_i128(i128::from(value)).value)
    }

    /// Converts a host double exactly.
    pub fn from_f64(value: f64) -> Self {
        Self::widen(Double::from_bits(u128::from(value.to_bits()))).unwrap_or_else(Self::nan)
    }

    /// Rounds to double precision and converts to a host double.
    pub fn to_f64(self, mode: RoundingMode) -> (f64, FpFlags) {
        if self.0.is_nan() {
            return (f64::NAN, FpFlags::NONE);
        }
        let (rounded, flags) = self.round(Format::DOUBLE, mode);
        (f64::from_bits(rounded.to_double_bits()), flags)
    }

    /// Largest finite magnitude of `format` with the given sign.
    pub fn max_finite(negative: bool, format: Format) -> Self {
        Self::from_parts(negative, format.emax, u64::MAX << (64 - format.precision))
    }

    /// Returns the sign bit.
    pub fn negative(self) -> bool {
        self.0.is_negative()
    }

    /// Returns the unbiased exponent of the integer bit, or `None` for non-finite values and zero.
    pub fn exponent(self) -> Option<i32> {
        self.0.is_finite_non_zero().then(|| exponent_of(self.0))
    }

    /// Returns the normalized 64-bit significand (zero for non-finite values and zero).
    ///
    /// Values wider than 64 bits, which only exist between a quad operation and its
    /// rounding, are truncated.
    pub fn significand(self) -> u64 {
        let Some(exp) = self.exponent() else {
            return 0;
        };
        let unit = self.0.abs().scalbn((63 - exp) as ExpInt);
        let mut exact = false;
        unit.to_u128_r(64, Round::TowardZero, &mut exact).value as u64
    }

    /// Returns the value with its sign replaced.
    pub fn with_sign(self, negative: bool) -> Self {
        let magnitude = self.0.abs();
        Self(if negative { -magnitude } else { magnitude })
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the negated value.
    pub fn neg(self) -> Self {
        Self(-self.0)
    }

    /// Widens any `rustc_apfloat` value into a quad. `None` for NaN.
    fn widen<T: FloatConvert<Quad>>(value: T) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let mut loses_info = false;
        Some(Self(value.convert(&mut loses_info).value))
    }

    /// Narrows a value already rounded to `T` and returns its interchange bits.
    fn narrow_bits<T: Float>(self) -> u128
    where
        Quad: FloatConvert<T>,
    {
        let mut loses_info = false;
        self.0.convert_r(Round::TowardZero, &mut loses_info).value.to_bits()
    }

    fn overflow(negative: bool, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        let value = if mode.overflows_to_infinity(negative) {
            Self::infinity(negative)
        } else {
            Self::max_finite(negative, format)
        };
        (value, FpFlags::OF | FpFlags::NX)
    }

    /// Result for a nonzero value far below half the smallest denormal of `format`.
    fn vanishing(negative: bool, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        let value = if mode.rounds_away(negative) {
            Self::from_parts(negative, format.emin - format.precision as i32 + 1, 1 << 63)
        } else {
            Self::zero(negative)
        };
        (value, FpFlags::UF | FpFlags::NX)
    }

    /// Rounds `self * 2^n` into `format`.
    ///
    /// This is the single rounding point of the software arithmetic. The mantissa is
    /// rounded by the `rustc_apfloat` type `T` of the same precision: normal results as a
    /// significand in `[1, 2)`, tiny ones placed at the same distance below `T`'s
    /// minimum exponent as they are below `emin`, so gradual underflow happens at the
    /// format's own boundary. Underflow is raised only for tiny inexact results.
    fn round_scaled(self, n: i32, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        match format.precision {
            24 => self.round_via::<Single>(n, format, mode),
            53 => self.round_via::<Double>(n, format, mode),
            _ => self.round_via::<X87DoubleExtended>(n, format, mode),
        }
    }

    fn round_via<T>(self, n: i32, format: Format, mode: RoundingMode) -> (Self, FpFlags)
    where
        T: Float + FloatConvert<Quad>,
        Quad: FloatConvert<T>,
    {
        let Some(own) = self.exponent() else {
            return (self, FpFlags::NONE);
        };
        let negative = self.negative();
        let exp = own.saturating_add(n);
        if exp > format.emax {
            return Self::overflow(negative, format, mode);
        }
        if exp < format.emin - format.precision as i32 - 1 {
            return Self::vanishing(negative, format, mode);
        }
        let target = if exp < format.emin {
            exp - format.emin + i32::from(T::MIN_EXP)
        } else {
            0
        };
        let unit = self.0.scalbn((-own) as ExpInt).scalbn(target as ExpInt);
        let mut loses_info = false;
        let StatusAnd { status, value } = unit.convert_r(mode.into(), &mut loses_info);
        let widened: Quad = value.convert(&mut loses_info).value;
        let result = Self(widened.scalbn((exp - target) as ExpInt));
        if result.exponent().is_some_and(|e| e > format.emax) {
            return Self::overflow(negative, format, mode);
        }
        (result, status.into())
    }

    /// Rounds a round-to-odd quad result into `format`, keeping its NV and DZ flags.
    fn settle(result: StatusAnd<Quad>, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        let status = result.status;
        let carried = FpFlags::from(status & (Status::INVALID_OP | Status::DIV_BY_ZERO));
        if status.contains(Status::OVERFLOW) {
            return Self::overflow(result.value.is_negative(), format, mode);
        }
        let (value, flags) = Self(round_to_odd(result)).round(format, mode);
        (value, flags | carried)
    }

    /// Parses a decimal literal such as `-12345e-3` and rounds it once into `format`.
    ///
    /// Malformed text yields NaN with NV.
    pub(crate) fn parse_decimal(text: &str, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        match Quad::from_str_r(text, Round::TowardZero) {
            Ok(parsed) => Self::settle(parsed, format, mode),
            Err(_) => (Self::nan(), FpFlags::NV),
        }
    }

    /// Rounds the value into `format`.
    pub fn round(self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        self.round_scaled(0, format, mode)
    }

    /// Adds two values and rounds the sum.
    pub fn add(self, other: Self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        let sum = self.0.add_r(other.0, Round::TowardZero);
        if sum.value.is_zero() && sum.status == Status::OK {
            // Exact zero sums take their sign from the rounding direction.
            return (Self(self.0.add_r(other.0, mode.into()).value), FpFlags::NONE);
        }
        Self::settle(sum, format, mode)
    }

    /// Subtracts `other` from `self` and rounds the difference.
    pub fn sub(self, other: Self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        self.add(other.neg(), format, mode)
    }

    /// Multiplies two values and rounds the product.
    pub fn mul(self, other: Self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        Self::settle(self.0.mul_r(other.0, Round::TowardZero), format, mode)
    }

    /// Divides `self` by `other` and rounds the quotient.
    pub fn div(self, other: Self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        Self::settle(self.0.div_r(other.0, Round::TowardZero), format, mode)
    }

    /// Computes the square root and rounds it.
    ///
    /// `rustc_apfloat` has no square root, so the root of the 64-bit significand is taken
    /// digit by digit and the remainder becomes the sticky bit.
    pub fn sqrt(self, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        if self.0.is_nan() {
            return (Self::nan(), FpFlags::NONE);
        }
        if self.0.is_zero() {
            return (self, FpFlags::NONE);
        }
        if self.negative() {
            return (Self::nan(), FpFlags::NV);
        }
        let Some(exp) = self.exponent() else {
            return (self, FpFlags::NONE);
        };
        let mut scale = exp - 63;
        let mut radicand = u128::from(self.significand());
        if scale & 1 != 0 {
            radicand <<= 1;
            scale -= 1;
        }
        // 33 significand pairs followed by 34 zero pairs.
        let mut rem: u128 = 0;
        let mut root: u128 = 0;
        for i in 0..67u32 {
            let pair = if i < 33 { (radicand >> (2 * (32 - i))) & 3 } else { 0 };
            rem = (rem << 2) | pair;
            let trial = (root << 2) | 1;
            root <<= 1;
            if rem >= trial {
                rem -= trial;
                root |= 1;
            }
        }
        let exact = Quad::from_u128(root).value.scalbn((scale / 2 - 34) as ExpInt);
        let status = if rem == 0 { Status::OK } else { Status::INEXACT };
        Self::settle(status.and(exact), format, mode)
    }

    /// Computes the remainder of `self / divisor` for finite nonzero operands.
    ///
    /// # Arguments
    ///
    /// * `divisor` - The divisor; must be finite and nonzero.
    /// * `kind` - Truncated (FMOD) or round-to-nearest (FREM) quotient.
    /// * `format` - Target format for the (exact) remainder.
    /// * `mode` - Rounding mode for the final narrowing.
    ///
    /// # Returns
    ///
    /// The remainder, the low seven bits of the integer quotient magnitude, and the
    /// raised flags. Special operands yield NaN with NV and a zero quotient.
    pub fn remainder(
        self,
        divisor: Self,
        kind: RemainderKind,
        format: Format,
        mode: RoundingMode,
    ) -> (Self, u8, FpFlags) {
        if !self.0.is_finite() || !divisor.0.is_finite_non_zero() {
            return (Self::nan(), 0, FpFlags::NV);
        }
        let b = divisor.0.abs();
        let truncated = self.0.c_fmod(b).value;
        // Reducing modulo 128 * |b| first keeps the quotient below 128.
        let wide = b.scalbn(7);
        let reduced = if wide.is_finite() { self.0.c_fmod(wide).value } else { self.0 };
        let whole = reduced.abs().div_r(b, Round::TowardZero).value;
        let mut exact = false;
        let quotient = whole.to_u128_r(8, Round::TowardZero, &mut exact).value as u8;
        let (r, quotient) = match kind {
            RemainderKind::Truncated => (truncated, quotient),
            RemainderKind::Nearest => {
                let nearest = self.0.ieee_rem(b).value;
                let stepped = nearest.partial_cmp(&truncated) != Some(Ordering::Equal);
                (nearest, quotient.wrapping_add(u8::from(stepped)))
            }
        };
        let low = quotient & 0x7f;
        if r.is_zero() {
            return (Self::zero(self.negative()), low, FpFlags::NONE);
        }
        let (value, flags) = Self(r).round(format, mode);
        (value, low, flags)
    }

    /// Multiplies by `2^n` and rounds into `format`.
    pub fn scale(self, n: i32, format: Format, mode: RoundingMode) -> (Self, FpFlags) {
        self.round_scaled(n, format, mode)
    }

    /// Rounds to an integral value in the given mode. Reports NX when the value changed.
    pub fn round_to_integral(self, mode: RoundingMode) -> (Self, FpFlags) {
        if !self.0.is_finite_non_zero() {
            return (self, FpFlags::NONE);
        }
        let StatusAnd { status, value } = self.0.round_to_integral(mode.into());
        // A negative fraction rounded to zero stays negative.
        (Self(value).with_sign(self.negative()), FpFlags::when(status.contains(Status::INEXACT), FpFlags::NX))
    }

    /// Converts to an integer in `[min, max]`, rounding in the given mode.
    ///
    /// Out-of-range values, infinities and NaNs saturate toward their sign and raise NV.
    pub fn to_integer(self, mode: RoundingMode, min: i64, max: i64) -> (i64, FpFlags) {
        let saturated = if self.negative() { min } else { max };
        if self.0.is_zero() {
            return (0, FpFlags::NONE);
        }
        if !self.0.is_finite() {
            return (saturated, FpFlags::NV);
        }
        let (rounded, flags) = self.round_to_integral(mode);
        let mut exact = false;
        let StatusAnd { status, value } = rounded.0.to_i128_r(128, Round::TowardZero, &mut exact);
        match i64::try_from(value) {
            Ok(value) if status == Status::OK && (min..=max).contains(&value) => (value, flags),
            _ => (saturated, FpFlags::NV),
        }
    }

    /// Returns the unbiased exponent as a value (FGETEXP). Non-finite inputs and zero pass through.
    pub fn get_exponent(self) -> Self {
        self.exponent().map_or(self, |exp| Self::from_i64(i64::from(exp)))
    }

    /// Returns the significand scaled into `[1, 2)` with the original sign (FGETMAN).
    pub fn get_mantissa(self) -> Self {
        self.exponent().map_or(self, |exp| Self(self.0.scalbn((-exp) as ExpInt)))
    }

    /// Numeric comparison. Zeros compare equal; NaN is unordered.
    pub fn compare(self, other: Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }

    /// Unpacks an IEEE single encoding. Returns `None` for NaN encodings; the caller owns
    /// payload handling.
    pub(crate) fn from_single_bits(bits: u32) -> Option<Self> {
        Self::widen(Single::from_bits(u128::from(bits)))
    }

    /// Unpacks an IEEE double encoding. Returns `None` for NaN encodings.
    pub(crate) fn from_double_bits(bits: u64) -> Option<Self> {
        Self::widen(Double::from_bits(u128::from(bits)))
    }

    /// Packs a value already rounded to [`Format::SINGLE`].
    pub(crate) fn to_single_bits(self) -> u32 {
        self.narrow_bits::<Single>() as u32
    }

    /// Packs a value already rounded to [`Format::DOUBLE`].
    pub(crate) fn to_double_bits(self) -> u64 {
        self.narrow_bits::<Double>() as u64
    }

    /// Builds a value from the 68881 extended fields (biased exponent and explicit mantissa).
    ///
    /// The caller handles the all-ones exponent (infinity and NaN).
    pub(crate) fn from_extended_fields(negative: bool, biased: u16, mantissa: u64) -> Self {
        Self::from_scaled(negative, mantissa, i32::from(biased) - 16383 - 63)
    }

    /// Returns the 68881 extended fields `(biased exponent, mantissa)` of a value already
    /// rounded to [`Format::EXTENDED`].
    pub(crate) fn to_extended_fields(self) -> (u16, u64) {
        if self.0.is_nan() || self.0.is_infinite() {
            return (0x7fff, 0);
        }
        let Some(exp) = self.exponent() else {
            return (0, 0);
        };
        let biased = exp + 16383;
        let sig = self.significand();
        if biased >= 0 {
            (biased as u16, sig)
        } else {
            (0, sig.checked_shr(biased.unsigned_abs()).unwrap_or(0))
        }
    }
}

impl FpValue for SoftFloat {
    fn class(&self) -> Class {
        match self.exponent() {
            Some(exp) if exp < Format::EXTENDED.emin => Class::Subnormal,
            Some(_) => Class::Normal,
            None if self.0.is_nan() => Class::Nan,
            None if self.0.is_infinite() => Class::Infinite,
            None => Class::Zero,
        }
    }

    fn is_sign_negative(&self) -> bool {
        self.negative()
    }

    fn zero(negative: bool) -> Self {
        Self::zero(negative)
    }

    fn infinity(negative: bool) -> Self {
        Self::infinity(negative)
    }
}
