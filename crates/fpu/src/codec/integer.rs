//! Integer wire formats (byte, word, long).

use crate::float::{RoundingMode, SoftFloat};
use crate::state::{ExceptionStatus, FpuRegister};

/// Converts a register to an integer in `[min, max]`.
///
/// Rounds in `mode`. Out-of-range values saturate and raise OPERR; a NaN stores `max`
/// when its sign is clear and `min` when set, also raising OPERR.
pub fn encode_integer(
    register: FpuRegister<SoftFloat>,
    mode: RoundingMode,
    min: i64,
    max: i64,
) -> (i64, ExceptionStatus) {
    match register {
        FpuRegister::NaN { negative, .. } => {
            (if negative { min } else { max }, ExceptionStatus::OPERR)
        }
        FpuRegister::Number(value) => {
            let (result, flags) = value.to_integer(mode, min, max);
            (result, ExceptionStatus::from(flags))
        }
    }
}

/// Sign-extends raw operand bits of the given width and converts them exactly.
pub fn decode_integer(raw: u32, width_bits: u32) -> SoftFloat {
    let shift = 32 - width_bits;
    SoftFloat::from_i64(i64::from(((raw << shift) as i32) >> shift))
}
