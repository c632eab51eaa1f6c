//! Packed decimal (BCD) wire format.
//!
//! Layout of the three long words:
//!
//! ```text
//! word 0: SM SE YY | exponent digits e2 e1 e0 (bits 27:16) | e3 (bits 15:12) | d0 (bits 3:0)
//! word 1: mantissa digits d1..d8
//! word 2: mantissa digits d9..d16
//! ```
//!
//! The value is `(-1)^SM * d0.d1..d16 * 10^((-1)^SE * e2e1e0)`. An exponent field of
//! `0x7fff` encodes infinity (zero mantissa) or NaN.

use crate::float::decimal::{from_decimal, to_decimal};
use crate::float::{Class, Format, FpFlags, FpValue, RoundingMode, SoftFloat};
use crate::state::register::QUIET_BIT;
use crate::state::{ExceptionStatus, FpuRegister};

use super::Decoded;

/// Number of significant digits in the packed format.
pub const DIGITS: usize = 17;

/// How a packed store chooses its significant-digit count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KFactor {
    /// Raw k-factor (7-bit static field or the low bits of a data register).
    pub value: i32,
    /// When false the k-factor is ignored: 17 digits are produced, rounded to nearest.
    pub honored: bool,
}

const fn from_bcd(digit: u32) -> u64 {
    let digit = digit & 0xf;
    (if digit < 10 { digit } else { digit - 10 }) as u64
}

/// Decodes a packed operand, rounding to nearest extended.
///
/// Raises INEX1 when the decimal value is not exactly representable.
pub fn decode_packed(words: [u32; 3]) -> Decoded {
    let negative = words[0] >> 31 != 0;
    if (words[0] >> 16) & 0x7fff == 0x7fff {
        if words[1] | words[2] == 0 {
            return Decoded::number(SoftFloat::infinity(negative));
        }
        let payload = (u64::from(words[1] | 0x4000_0000) << 32) | u64::from(words[2]);
        return Decoded {
            register: FpuRegister::NaN { payload, negative },
            exceptions: ExceptionStatus::when(
                (u64::from(words[1]) << 32) & QUIET_BIT == 0,
                ExceptionStatus::SNAN,
            ),
        };
    }

    let mut mantissa = from_bcd(words[0]);
    for word in [words[1], words[2]] {
        for i in 0..8 {
            mantissa = mantissa * 10 + from_bcd(word >> (28 - 4 * i));
        }
    }
    let magnitude = (from_bcd(words[0] >> 24) * 100
        + from_bcd(words[0] >> 20) * 10
        + from_bcd(words[0] >> 16)) as i32;
    let exponent = if words[0] & 0x4000_0000 != 0 { -magnitude } else { magnitude };

    let (value, flags) = from_decimal(
        negative,
        mantissa,
        exponent - (DIGITS as i32 - 1),
        Format::EXTENDED,
        RoundingMode::Nearest,
    );
    Decoded {
        register: FpuRegister::Number(value),
        exceptions: ExceptionStatus::when(flags.contains(FpFlags::NX), ExceptionStatus::INEX1),
    }
}

/// Encodes a register as packed decimal.
///
/// # Arguments
///
/// * `register` - Source register.
/// * `k_factor` - Digit-count control. Positive values give that many significant digits
///   (values from 18 to 63 raise OPERR and clamp to 17); values of 64 and above are
///   negative 7-bit numbers; zero and negative values count digits right of the decimal
///   point.
/// * `mode` - Rounding mode for the digit string.
pub fn encode_packed(
    register: FpuRegister<SoftFloat>,
    k_factor: KFactor,
    mode: RoundingMode,
) -> ([u32; 3], ExceptionStatus) {
    let value = match register {
        FpuRegister::NaN { payload, negative } => {
            let sign = u32::from(negative) << 31;
            return (
                [0x7fff_0000 | sign, (payload >> 32) as u32, payload as u32],
                ExceptionStatus::NONE,
            );
        }
        FpuRegister::Number(value) => value,
    };
    let sign = u32::from(value.negative()) << 31;
    match value.class() {
        Class::Zero => return ([sign, 0, 0], ExceptionStatus::NONE),
        Class::Infinite => return ([0x7fff_0000 | sign, 0, 0], ExceptionStatus::NONE),
        _ => {}
    }
    let Some(digits) = to_decimal(value) else {
        return ([0x7fff_0000 | sign, u32::MAX, u32::MAX], ExceptionStatus::NONE);
    };

    let mut exceptions = ExceptionStatus::NONE;
    let (count, mode) = if k_factor.honored {
        let mut k = k_factor.value;
        if k >= 64 {
            k -= 128;
        } else if k >= 18 {
            exceptions |= ExceptionStatus::OPERR;
        }
        if k <= 0 {
            k = digits.exponent - k + 1;
        }
        (k.clamp(1, DIGITS as i32) as usize, mode)
    } else {
        (DIGITS, RoundingMode::Nearest)
    };

    let (rounded, inexact) = digits.round_to(count, value.negative(), mode);
    let mut padded = rounded.digits;
    padded.resize(DIGITS, 0);

    let mut word0 = sign | u32::from(padded[0]);
    if rounded.exponent < 0 {
        word0 |= 0x4000_0000;
    }
    let e = rounded.exponent.unsigned_abs();
    word0 |= (e % 10) << 16 | (e / 10 % 10) << 20 | (e / 100 % 10) << 24;
    if e >= 1000 {
        exceptions |= ExceptionStatus::OPERR;
        word0 |= ((e / 1000) & 0xf) << 12;
    }
    let pack = |chunk: &[u8]| chunk.iter().fold(0u32, |acc, &d| (acc << 4) | u32::from(d));
    let words = [word0, pack(&padded[1..9]), pack(&padded[9..17])];
    if inexact {
        exceptions |= ExceptionStatus::INEX2;
    }
    (words, exceptions)
}
