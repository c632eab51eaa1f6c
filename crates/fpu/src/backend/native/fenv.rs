//! Host floating-point environment access through the C `fenv` interface.
//!
//! Flag and rounding constants are the glibc/musl values for each supported
//! architecture. Host exception flags are translated into an architecture-neutral
//! 6-bit index (x87 status-word order) before table lookup:
//!
//! | Index bit | Condition          |
//! |-----------|--------------------|
//! | 0x01      | Invalid operation  |
//! | 0x02      | Denormal operand   |
//! | 0x04      | Divide by zero     |
//! | 0x08      | Overflow           |
//! | 0x10      | Underflow          |
//! | 0x20      | Inexact            |

use libc::c_int;

use crate::float::RoundingMode;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod arch {
    use libc::c_int;

    pub const FE_TONEAREST: c_int = 0x000;
    pub const FE_DOWNWARD: c_int = 0x400;
    pub const FE_UPWARD: c_int = 0x800;
    pub const FE_TOWARDZERO: c_int = 0xc00;

    pub const FE_INVALID: c_int = 0x01;
    pub const FE_DENORMAL: c_int = 0x02;
    pub const FE_DIVBYZERO: c_int = 0x04;
    pub const FE_OVERFLOW: c_int = 0x08;
    pub const FE_UNDERFLOW: c_int = 0x10;
    pub const FE_INEXACT: c_int = 0x20;
}

#[cfg(target_arch = "aarch64")]
mod arch {
    use libc::c_int;

    pub const FE_TONEAREST: c_int = 0x000000;
    pub const FE_UPWARD: c_int = 0x400000;
    pub const FE_DOWNWARD: c_int = 0x800000;
    pub const FE_TOWARDZERO: c_int = 0xc00000;

    pub const FE_INVALID: c_int = 0x01;
    /// No denormal-operand flag is exposed through `fenv` on this architecture.
    pub const FE_DENORMAL: c_int = 0x00;
    pub const FE_DIVBYZERO: c_int = 0x02;
    pub const FE_OVERFLOW: c_int = 0x04;
    pub const FE_UNDERFLOW: c_int = 0x08;
    pub const FE_INEXACT: c_int = 0x10;
}

pub use arch::*;

/// Every exception flag this module reads or writes.
pub const FE_ALL_EXCEPT: c_int =
    FE_INVALID | FE_DENORMAL | FE_DIVBYZERO | FE_OVERFLOW | FE_UNDERFLOW | FE_INEXACT;

unsafe extern "C" {
    fn fesetround(round: c_int) -> c_int;
    fn fegetround() -> c_int;
    fn feclearexcept(excepts: c_int) -> c_int;
    fn fetestexcept(excepts: c_int) -> c_int;
    fn feraiseexcept(excepts: c_int) -> c_int;
    fn rint(x: f64) -> f64;
}

/// Maps an emulated rounding mode to the host constant.
pub const fn host_round(mode: RoundingMode) -> c_int {
    match mode {
        RoundingMode::Nearest => FE_TONEAREST,
        RoundingMode::Zero => FE_TOWARDZERO,
        RoundingMode::Minus => FE_DOWNWARD,
        RoundingMode::Plus => FE_UPWARD,
    }
}

/// Sets the host rounding direction. Returns false if the host rejected it.
pub fn set_round(round: c_int) -> bool {
    // SAFETY: fesetround only writes the calling thread's FP control register and
    // validates its argument.
    unsafe { fesetround(round) == 0 }
}

/// Returns the host rounding direction.
pub fn get_round() -> c_int {
    // SAFETY: fegetround only reads the calling thread's FP control register.
    unsafe { fegetround() }
}

/// Clears host exception flags.
pub fn clear(excepts: c_int) {
    // SAFETY: feclearexcept only writes the calling thread's FP status register.
    unsafe {
        let _ = feclearexcept(excepts);
    }
}

/// Returns the subset of `excepts` currently raised on the host.
pub fn test(excepts: c_int) -> c_int {
    // SAFETY: fetestexcept only reads the calling thread's FP status register.
    unsafe { fetestexcept(excepts) }
}

/// Raises host exception flags. Host traps are masked by default, so this only sets
/// status bits.
pub fn raise(excepts: c_int) {
    // SAFETY: feraiseexcept only writes the calling thread's FP status register; with
    // the default masked environment no signal is delivered.
    unsafe {
        let _ = feraiseexcept(excepts);
    }
}

/// Rounds to an integral value in the current host rounding direction.
pub fn round_integral(x: f64) -> f64 {
    // SAFETY: rint is a pure libm function of its argument and the thread's FP state.
    unsafe { rint(x) }
}

/// Compresses host flags into the architecture-neutral 6-bit index.
pub const fn host_index(flags: c_int) -> usize {
    let mut index = 0;
    if flags & FE_INVALID != 0 {
        index |= 0x01;
    }
    if FE_DENORMAL != 0 && flags & FE_DENORMAL != 0 {
        index |= 0x02;
    }
    if flags & FE_DIVBYZERO != 0 {
        index |= 0x04;
    }
    if flags & FE_OVERFLOW != 0 {
        index |= 0x08;
    }
    if flags & FE_UNDERFLOW != 0 {
        index |= 0x10;
    }
    if flags & FE_INEXACT != 0 {
        index |= 0x20;
    }
    index
}

/// Saves the host rounding direction and exception flags, restoring both on drop.
///
/// Restoration also happens while unwinding, so a panicking caller cannot leak an
/// emulated rounding mode into host code.
#[derive(Debug)]
pub struct HostFpGuard {
    round: c_int,
    flags: c_int,
}

impl HostFpGuard {
    /// Captures the current host environment.
    pub fn enter() -> Self {
        Self { round: get_round(), flags: test(FE_ALL_EXCEPT) }
    }
}

impl Drop for HostFpGuard {
    fn drop(&mut self) {
        clear(FE_ALL_EXCEPT);
        raise(self.flags);
        let _ = set_round(self.round);
    }
}
