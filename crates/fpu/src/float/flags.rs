//! IEEE exception flags raised by the software arithmetic.
//!
//! The software float reports the five IEEE 754 conditions (converted from the
//! `rustc_apfloat` status of each step); the status translator in
//! [`crate::state::status`] maps them onto the 68881 exception byte:
//!
//! | Flag | IEEE condition     | 68881 exception |
//! |------|--------------------|-----------------|
//! | NV   | Invalid Operation  | OPERR           |
//! | DZ   | Divide by Zero     | DZ              |
//! | OF   | Overflow           | OVFL            |
//! | UF   | Underflow          | UNFL            |
//! | NX   | Inexact            | INEX2           |

use std::ops::{BitOr, BitOrAssign};

use rustc_apfloat::Status;

/// IEEE exception flags produced by one software operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FpFlags(u8);

impl FpFlags {
    /// No exceptions raised.
    pub const NONE: Self = Self(0);
    /// Invalid Operation.
    pub const NV: Self = Self(1 << 4);
    /// Divide by Zero.
    pub const DZ: Self = Self(1 << 3);
    /// Overflow.
    pub const OF: Self = Self(1 << 2);
    /// Underflow.
    pub const UF: Self = Self(1 << 1);
    /// Inexact.
    pub const NX: Self = Self(1 << 0);

    /// Returns the raw 5-bit flag value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true if the specified flag is set.
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns `flag` if `cond` holds, otherwise no flags.
    pub const fn when(cond: bool, flag: Self) -> Self {
        if cond { flag } else { Self::NONE }
    }
}

impl BitOr for FpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<Status> for FpFlags {
    fn from(status: Status) -> Self {
        Self::when(status.contains(Status::INVALID_OP), Self::NV)
            | Self::when(status.contains(Status::DIV_BY_ZERO), Self::DZ)
            | Self::when(status.contains(Status::OVERFLOW), Self::OF)
            | Self::when(status.contains(Status::UNDERFLOW), Self::UF)
            | Self::when(status.contains(Status::INEXACT), Self::NX)
    }
}
