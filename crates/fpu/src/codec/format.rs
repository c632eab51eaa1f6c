//! Operand format tags.

/// The seven memory formats selected by the 3-bit size field of an extension word.
///
/// Size code 7 is only meaningful for FMOVE to memory, where it selects packed decimal
/// with a dynamic k-factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandFormat {
    /// 32-bit signed integer (`.L`).
    Long,
    /// IEEE single (`.S`).
    Single,
    /// 96-bit extended (`.X`).
    Extended,
    /// 96-bit packed decimal with a static k-factor (`.P`).
    Packed,
    /// 16-bit signed integer (`.W`).
    Word,
    /// IEEE double (`.D`).
    Double,
    /// 8-bit signed integer (`.B`).
    Byte,
    /// Packed decimal with the k-factor taken from a data register.
    PackedDynamic,
}

impl OperandFormat {
    /// Decodes the 3-bit size field.
    pub const fn from_size(code: u16) -> Self {
        match code & 7 {
            0 => Self::Long,
            1 => Self::Single,
            2 => Self::Extended,
            3 => Self::Packed,
            4 => Self::Word,
            5 => Self::Double,
            6 => Self::Byte,
            _ => Self::PackedDynamic,
        }
    }

    /// Returns the operand width in memory.
    pub const fn byte_len(self) -> u32 {
        match self {
            Self::Long | Self::Single => 4,
            Self::Extended | Self::Packed | Self::PackedDynamic => 12,
            Self::Word => 2,
            Self::Double => 8,
            Self::Byte => 1,
        }
    }

    /// Returns the signed range of integer formats.
    pub const fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Long => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Word => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Byte => Some((i8::MIN as i64, i8::MAX as i64)),
            _ => None,
        }
    }

    /// Returns true for the formats a data register can hold directly.
    pub const fn fits_data_register(self) -> bool {
        matches!(self, Self::Long | Self::Single | Self::Word | Self::Byte)
    }

    /// Returns true for either packed-decimal format.
    pub const fn is_packed(self) -> bool {
        matches!(self, Self::Packed | Self::PackedDynamic)
    }
}
