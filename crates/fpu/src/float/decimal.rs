//! Exact binary/decimal conversion for the packed-decimal format.
//!
//! Decimal to binary goes through `rustc_apfloat`'s correctly rounded string parser.
//! Binary to decimal needs every digit of the value (a few thousand for extended
//! denormals) so that the k-factor rounding sees the exact tail; [`BigUint`] covers
//! the multiply-and-print steps of that expansion and nothing more.

use super::flags::FpFlags;
use super::rounding::RoundingMode;
use super::soft::{Format, SoftFloat};

/// Largest power of five that fits a limb.
const FIVE_POW_13: u32 = 1_220_703_125;

/// Little-endian arbitrary-precision unsigned integer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BigUint {
    limbs: Vec<u32>,
}

impl BigUint {
    /// Builds from a 128-bit value.
    pub fn from_u128(mut value: u128) -> Self {
        let mut limbs = Vec::with_capacity(4);
        while value != 0 {
            limbs.push(value as u32);
            value >>= 32;
        }
        Self { limbs }
    }

    fn trim(&mut self) {
        let len = self.limbs.iter().rposition(|&limb| limb != 0).map_or(0, |top| top + 1);
        self.limbs.truncate(len);
    }

    /// Returns true for zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Multiplies in place by a small factor.
    pub fn mul_small(&mut self, factor: u32) {
        let mut carry = 0u64;
        for limb in &mut self.limbs {
            let wide = u64::from(*limb) * u64::from(factor) + carry;
            *limb = wide as u32;
            carry = wide >> 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
        self.trim();
    }

    /// Multiplies in place by `5^exp`.
    pub fn mul_pow5(&mut self, mut exp: u32) {
        while exp >= 13 {
            self.mul_small(FIVE_POW_13);
            exp -= 13;
        }
        self.mul_small(5u32.pow(exp));
    }

    /// Divides in place by a small divisor and returns the remainder.
    pub fn divrem_small(&mut self, divisor: u32) -> u32 {
        let mut rem = 0u64;
        for limb in self.limbs.iter_mut().rev() {
            let wide = (rem << 32) | u64::from(*limb);
            *limb = (wide / u64::from(divisor)) as u32;
            rem = wide % u64::from(divisor);
        }
        self.trim();
        rem as u32
    }

    /// Shifts left in place.
    pub fn shl(&mut self, bits: u32) {
        if self.is_zero() {
            return;
        }
        let words = (bits / 32) as usize;
        let bits = bits % 32;
        if bits != 0 {
            let mut carry = 0u32;
            for limb in &mut self.limbs {
                let next = *limb >> (32 - bits);
                *limb = (*limb << bits) | carry;
                carry = next;
            }
            if carry != 0 {
                self.limbs.push(carry);
            }
        }
        if words != 0 {
            let mut shifted = vec![0; words];
            shifted.append(&mut self.limbs);
            self.limbs = shifted;
        }
    }

    /// Renders the value as decimal digits, most significant first. Zero renders as `[0]`.
    pub fn to_decimal_digits(&self) -> Vec<u8> {
        let mut value = self.clone();
        let mut chunks = Vec::new();
        while !value.is_zero() {
            chunks.push(value.divrem_small(1_000_000_000));
        }
        let mut digits = Vec::with_capacity(chunks.len() * 9);
        for (i, chunk) in chunks.iter().rev().enumerate() {
            let text = if i == 0 { chunk.to_string() } else { format!("{chunk:09}") };
            digits.extend(text.bytes().map(|b| b - b'0'));
        }
        if digits.is_empty() {
            digits.push(0);
        }
        digits
    }
}

/// A finite nonzero value written as `d0.d1d2... * 10^exponent` with `d0 != 0`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecimalDigits {
    /// Significant digits, most significant first.
    pub digits: Vec<u8>,
    /// Decimal exponent of the first digit.
    pub exponent: i32,
}

impl DecimalDigits {
    /// Rounds to exactly `count` significant digits.
    ///
    /// # Returns
    ///
    /// The rounded digits (a carry out of the top digit bumps the exponent) and whether
    /// any nonzero digit was discarded.
    pub fn round_to(&self, count: usize, negative: bool, mode: RoundingMode) -> (Self, bool) {
        if self.digits.len() <= count {
            let mut digits = self.digits.clone();
            digits.resize(count, 0);
            return (Self { digits, exponent: self.exponent }, false);
        }
        let mut digits = self.digits[..count].to_vec();
        let round = self.digits[count];
        let rest = self.digits[count + 1..].iter().any(|&d| d != 0);
        let inexact = round != 0 || rest;
        let odd = digits.last().is_some_and(|d| d & 1 == 1);
        let increment = match mode {
            RoundingMode::Nearest => round > 5 || (round == 5 && (rest || odd)),
            _ => mode.rounds_away(negative) && inexact,
        };
        let mut exponent = self.exponent;
        if increment {
            let mut carry = true;
            for d in digits.iter_mut().rev() {
                if *d == 9 {
                    *d = 0;
                } else {
                    *d += 1;
                    carry = false;
                    break;
                }
            }
            if carry {
                digits.insert(0, 1);
                digits.truncate(count);
                exponent += 1;
            }
        }
        (Self { digits, exponent }, inexact)
    }
}

/// Expands a finite nonzero value into its exact decimal digits.
///
/// Returns `None` for zero, infinities and NaN.
pub fn to_decimal(value: SoftFloat) -> Option<DecimalDigits> {
    let exp = value.exponent()?;
    let sig = value.significand();
    let tz = sig.trailing_zeros();
    let mantissa = sig >> tz;
    let binary_exp = exp - 63 + tz as i32;
    let mut n = BigUint::from_u128(u128::from(mantissa));
    let decimal_shift = if binary_exp >= 0 {
        n.shl(binary_exp as u32);
        0
    } else {
        // m * 2^-e == m * 5^e * 10^-e
        n.mul_pow5(binary_exp.unsigned_abs());
        binary_exp
    };
    let mut digits = n.to_decimal_digits();
    let exponent = digits.len() as i32 - 1 + decimal_shift;
    let significant = digits.iter().rposition(|&d| d != 0).map_or(1, |last| last + 1);
    digits.truncate(significant);
    Some(DecimalDigits { digits, exponent })
}

/// Converts `mantissa * 10^exp10` and rounds once into `format`.
pub fn from_decimal(
    negative: bool,
    mantissa: u64,
    exp10: i32,
    format: Format,
    mode: RoundingMode,
) -> (SoftFloat, FpFlags) {
    if mantissa == 0 {
        return (SoftFloat::zero(negative), FpFlags::NONE);
    }
    let sign = if negative { "-" } else { "" };
    SoftFloat::parse_decimal(&format!("{sign}{mantissa}e{exp10}"), format, mode)
}
