//! Architectural FPU state.
//!
//! This module implements the programmer-visible state of the 68881/68040 FPU. It provides:
//! 1. **Status Bits:** Typed views of the FPSR condition, quotient, exception and accrued bytes.
//! 2. **Control Register:** Decoding of FPCR rounding controls and exception enables.
//! 3. **Registers:** The NaN-tagged register cell holding a backend value.
//! 4. **Context:** The complete register file with reset and dump support.

/// Generates a bit-set newtype over a `u32` register field.
macro_rules! status_bits {
    (
        $(#[$meta:meta])*
        $name:ident, mask = $mask:expr;
        $( $(#[$fmeta:meta])* $flag:ident = $value:expr; )*
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            $( $(#[$fmeta])* pub const $flag: Self = Self($value); )*

            /// No bits set.
            pub const NONE: Self = Self(0);

            /// Every bit this field owns inside its register.
            pub const MASK: u32 = $mask;

            /// Builds from raw register bits, discarding bits outside the field.
            pub const fn from_bits(bits: u32) -> Self {
                Self(bits & Self::MASK)
            }

            /// Returns the raw bits in their register position.
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Returns true if no bits are set.
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Returns true if every bit of `other` is set.
            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            /// Returns true if any bit of `other` is set.
            pub const fn intersects(self, other: Self) -> bool {
                (self.0 & other.0) != 0
            }

            /// Returns `flag` if `cond` holds, otherwise no bits.
            pub const fn when(cond: bool, flag: Self) -> Self {
                if cond { flag } else { Self::NONE }
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }
    };
}

/// FPSR fields and the exception accrual rules.
pub mod status;

/// FPCR decoding.
pub mod control;

/// NaN-tagged register cell.
pub mod register;

/// Complete register file.
pub mod context;

pub use context::FpuContext;
pub use control::ControlRegister;
pub use register::FpuRegister;
pub use status::{AccruedExceptions, ConditionCodes, ExceptionStatus, Quotient, StatusRegister};
