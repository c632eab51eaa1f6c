//! Wire-format codec.
//!
//! This module converts between memory operands and register contents. It provides:
//! 1. **Format Tags:** The seven operand formats of the size field.
//! 2. **Binary Formats:** IEEE single/double and the 96-bit extended format.
//! 3. **Integer Formats:** Byte, word and long with saturating conversion.
//! 4. **Packed Decimal:** BCD operands with k-factor controlled digit counts.
//!
//! Register contents are exchanged as `FpuRegister<SoftFloat>`; backends import and
//! export their own value types at the boundary. Operands are carried as up to three
//! long words: narrower formats occupy the low bits of `words[0]`.

/// IEEE and extended formats.
pub mod binary;

/// Operand format tags.
pub mod format;

/// Integer formats.
pub mod integer;

/// Packed decimal format.
pub mod packed;

use tracing::trace;

use crate::float::{RoundingMode, SoftFloat};
use crate::state::{ExceptionStatus, FpuRegister};

pub use format::OperandFormat;
pub use packed::KFactor;

/// A decoded operand and the exceptions raised while decoding it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoded {
    /// The operand as a register value.
    pub register: FpuRegister<SoftFloat>,
    /// SNAN or INEX1 raised by the conversion.
    pub exceptions: ExceptionStatus,
}

impl Decoded {
    /// A numeric operand that raised nothing.
    pub const fn number(value: SoftFloat) -> Self {
        Self { register: FpuRegister::Number(value), exceptions: ExceptionStatus::NONE }
    }
}

/// Decodes a source operand.
///
/// # Arguments
///
/// * `format` - The operand format; integer formats take their bits from `words[0]`.
/// * `words` - The operand as fetched, most significant long word first.
pub fn decode(format: OperandFormat, words: [u32; 3]) -> Decoded {
    let decoded = match format {
        OperandFormat::Long => Decoded::number(integer::decode_integer(words[0], 32)),
        OperandFormat::Word => Decoded::number(integer::decode_integer(words[0], 16)),
        OperandFormat::Byte => Decoded::number(integer::decode_integer(words[0], 8)),
        OperandFormat::Single => binary::decode_single(words[0]),
        OperandFormat::Double => binary::decode_double(words[0], words[1]),
        OperandFormat::Extended => binary::decode_extended(words, true),
        OperandFormat::Packed | OperandFormat::PackedDynamic => packed::decode_packed(words),
    };
    trace!(?format, ?words, register = ?decoded.register, "decoded operand");
    decoded
}

/// Encodes a register for a store.
///
/// # Arguments
///
/// * `register` - Source register contents.
/// * `format` - Destination format.
/// * `mode` - Current rounding mode.
/// * `k_factor` - Digit-count control; consulted only by packed formats.
///
/// # Returns
///
/// The operand long words (narrow formats in `words[0]`) and the raised exceptions.
pub fn encode(
    register: FpuRegister<SoftFloat>,
    format: OperandFormat,
    mode: RoundingMode,
    k_factor: KFactor,
) -> ([u32; 3], ExceptionStatus) {
    let (words, exceptions) = match format {
        OperandFormat::Long | OperandFormat::Word | OperandFormat::Byte => {
            let (min, max) = format.integer_range().unwrap_or((i64::MIN, i64::MAX));
            let (value, exceptions) = integer::encode_integer(register, mode, min, max);
            ([value as u32, 0, 0], exceptions)
        }
        OperandFormat::Single => {
            let (bits, exceptions) = binary::encode_single(register, mode);
            ([bits, 0, 0], exceptions)
        }
        OperandFormat::Double => {
            let ([hi, lo], exceptions) = binary::encode_double(register, mode);
            ([hi, lo, 0], exceptions)
        }
        OperandFormat::Extended => binary::encode_extended(register, mode),
        OperandFormat::Packed | OperandFormat::PackedDynamic => {
            packed::encode_packed(register, k_factor, mode)
        }
    };
    trace!(?format, ?register, ?words, "encoded operand");
    (words, exceptions)
}
