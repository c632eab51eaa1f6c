//! NaN-tagged register cell.
//!
//! A register holds either a number in the backend's representation or a NaN with an
//! explicit 64-bit payload and sign. Keeping NaNs out of the numeric representation lets
//! every backend preserve payloads bit-exactly, even when its value type cannot.

use std::fmt;

/// Payload of the default NaN produced by invalid operations and by reset.
pub const DEFAULT_NAN_PAYLOAD: u64 = u64::MAX;

/// Payload bit that distinguishes quiet (set) from signaling (clear) NaNs.
pub const QUIET_BIT: u64 = 1 << 62;

/// One FPU data register.
#[derive(Clone, Copy, PartialEq)]
pub enum FpuRegister<T> {
    /// A number (including zeros and infinities).
    Number(T),
    /// A NaN with its mantissa payload and sign.
    NaN {
        /// The 64-bit extended mantissa of the NaN.
        payload: u64,
        /// Sign bit.
        negative: bool,
    },
}

impl<T> FpuRegister<T> {
    /// The default quiet NaN.
    pub const fn default_nan() -> Self {
        Self::NaN { payload: DEFAULT_NAN_PAYLOAD, negative: false }
    }

    /// Returns true for NaNs.
    pub const fn is_nan(&self) -> bool {
        matches!(self, Self::NaN { .. })
    }

    /// Returns true for signaling NaNs (quiet bit clear).
    pub const fn is_signaling(&self) -> bool {
        matches!(self, Self::NaN { payload, .. } if *payload & QUIET_BIT == 0)
    }

    /// Returns the number, or `None` for NaNs.
    pub const fn number(&self) -> Option<&T> {
        match self {
            Self::Number(value) => Some(value),
            Self::NaN { .. } => None,
        }
    }
}

impl<T: Copy> FpuRegister<T> {
    /// Returns the register with a NaN payload's quiet bit set. Numbers pass through.
    pub fn quieted(self) -> Self {
        match self {
            Self::NaN { payload, negative } => Self::NaN { payload: payload | QUIET_BIT, negative },
            number => number,
        }
    }

    /// Returns the register with the sign of a NaN replaced. Numbers pass through.
    pub fn with_nan_sign(self, negative: bool) -> Self {
        match self {
            Self::NaN { payload, .. } => Self::NaN { payload, negative },
            number => number,
        }
    }
}

impl<T> Default for FpuRegister<T> {
    fn default() -> Self {
        Self::default_nan()
    }
}

impl<T: fmt::Debug> fmt::Debug for FpuRegister<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value:?}"),
            Self::NaN { payload, negative } => {
                let sign = if *negative { "-" } else { "" };
                write!(f, "{sign}nan({payload:#018x})")
            }
        }
    }
}
