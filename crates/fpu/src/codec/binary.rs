//! IEEE single, double and 68881 extended wire formats.
//!
//! NaNs keep their mantissa as a 64-bit extended payload: the single and double fraction
//! is left-aligned below the explicit integer bit, and the quiet bit is always set in the
//! stored payload. Encoding a signaling NaN to single or double raises SNAN.

use crate::float::{Format, RoundingMode, SoftFloat};
use crate::state::register::QUIET_BIT;
use crate::state::{ExceptionStatus, FpuRegister};

use super::Decoded;

/// Decodes an IEEE single.
pub fn decode_single(bits: u32) -> Decoded {
    match SoftFloat::from_single_bits(bits) {
        Some(value) => Decoded::number(value),
        None => {
            let fraction = bits & 0x007f_ffff;
            Decoded {
                register: FpuRegister::NaN {
                    payload: u64::from(fraction | 0x00c0_0000) << 40,
                    negative: bits >> 31 != 0,
                },
                exceptions: ExceptionStatus::when(fraction & 0x0040_0000 == 0, ExceptionStatus::SNAN),
            }
        }
    }
}

/// Decodes an IEEE double from its high and low long words.
pub fn decode_double(hi: u32, lo: u32) -> Decoded {
    let bits = (u64::from(hi) << 32) | u64::from(lo);
    match SoftFloat::from_double_bits(bits) {
        Some(value) => Decoded::number(value),
        None => {
            let fraction_hi = hi & 0x000f_ffff;
            Decoded {
                register: FpuRegister::NaN {
                    payload: (u64::from(fraction_hi | 0x0018_0000) << 43) | (u64::from(lo) << 11),
                    negative: hi >> 31 != 0,
                },
                exceptions: ExceptionStatus::when(
                    fraction_hi & 0x0008_0000 == 0,
                    ExceptionStatus::SNAN,
                ),
            }
        }
    }
}

/// Decodes a 96-bit extended operand.
///
/// # Arguments
///
/// * `words` - Sign/exponent word (upper half used), then the two mantissa long words.
/// * `check_snan` - Raise SNAN and quiet the payload for signaling NaNs. FMOVEM loads
///   transfer registers verbatim and pass `false`.
pub fn decode_extended(words: [u32; 3], check_snan: bool) -> Decoded {
    let negative = words[0] >> 31 != 0;
    let biased = ((words[0] >> 16) & 0x7fff) as u16;
    let mantissa = (u64::from(words[1]) << 32) | u64::from(words[2]);
    if biased != 0x7fff {
        return Decoded::number(SoftFloat::from_extended_fields(negative, biased, mantissa));
    }
    if mantissa & !(1 << 63) == 0 {
        return Decoded::number(SoftFloat::infinity(negative));
    }
    let signaling = check_snan && mantissa & QUIET_BIT == 0;
    let payload = if check_snan { mantissa | QUIET_BIT } else { mantissa };
    Decoded {
        register: FpuRegister::NaN { payload, negative },
        exceptions: ExceptionStatus::when(signaling, ExceptionStatus::SNAN),
    }
}

/// Encodes to an IEEE single, rounding in `mode`.
pub fn encode_single(register: FpuRegister<SoftFloat>, mode: RoundingMode) -> (u32, ExceptionStatus) {
    match register {
        FpuRegister::NaN { payload, negative } => {
            let word = 0x7f80_0000 | (((payload | QUIET_BIT) >> 40) as u32 & 0x007f_ffff);
            (word | (u32::from(negative) << 31), snan_status(payload))
        }
        FpuRegister::Number(value) => {
            let (rounded, flags) = value.round(Format::SINGLE, mode);
            (rounded.to_single_bits(), ExceptionStatus::from(flags))
        }
    }
}

/// Encodes to an IEEE double as `(high, low)` long words, rounding in `mode`.
pub fn encode_double(
    register: FpuRegister<SoftFloat>,
    mode: RoundingMode,
) -> ([u32; 2], ExceptionStatus) {
    match register {
        FpuRegister::NaN { payload, negative } => {
            let quiet = payload | QUIET_BIT;
            let hi = 0x7ff0_0000 | ((quiet >> 43) as u32 & 0x000f_ffff) | (u32::from(negative) << 31);
            ([hi, (quiet >> 11) as u32], snan_status(payload))
        }
        FpuRegister::Number(value) => {
            let (rounded, flags) = value.round(Format::DOUBLE, mode);
            let bits = rounded.to_double_bits();
            ([(bits >> 32) as u32, bits as u32], ExceptionStatus::from(flags))
        }
    }
}

/// Encodes to the 96-bit extended format. NaN payloads are written verbatim.
pub fn encode_extended(register: FpuRegister<SoftFloat>, mode: RoundingMode) -> ([u32; 3], ExceptionStatus) {
    match register {
        FpuRegister::NaN { payload, negative } => (
            [0x7fff_0000 | (u32::from(negative) << 31), (payload >> 32) as u32, payload as u32],
            ExceptionStatus::NONE,
        ),
        FpuRegister::Number(value) => {
            let (rounded, flags) = value.round(Format::EXTENDED, mode);
            let (biased, mantissa) = rounded.to_extended_fields();
            let sign = u32::from(rounded.negative()) << 31;
            (
                [sign | (u32::from(biased) << 16), (mantissa >> 32) as u32, mantissa as u32],
                ExceptionStatus::from(flags),
            )
        }
    }
}

fn snan_status(payload: u64) -> ExceptionStatus {
    ExceptionStatus::when(payload & QUIET_BIT == 0, ExceptionStatus::SNAN)
}
