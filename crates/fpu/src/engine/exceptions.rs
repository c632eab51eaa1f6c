//! Exception-enable checking and trap vector selection.
//!
//! The engine records every exception in the FPSR. When an exception is also enabled in
//! the FPCR, the faulting instruction's address is latched into FPIAR and the
//! instruction completes with [`Completion::TrapPending`] carrying the vector of the
//! highest-priority enabled exception. Building the exception stack frame and taking
//! the trap is left to the integer core.

use tracing::warn;

use crate::backend::FpuBackend;
use crate::state::ExceptionStatus;

use super::{Completion, Fpu};

/// Branch/set on unordered.
pub const BSUN_VECTOR: u8 = 48;
/// Inexact result (INEX1 or INEX2).
pub const INEX_VECTOR: u8 = 49;
/// Divide by zero.
pub const DZ_VECTOR: u8 = 50;
/// Underflow.
pub const UNFL_VECTOR: u8 = 51;
/// Operand error.
pub const OPERR_VECTOR: u8 = 52;
/// Overflow.
pub const OVFL_VECTOR: u8 = 53;
/// Signaling NaN.
pub const SNAN_VECTOR: u8 = 54;
/// TRAPcc, taken by FTRAPcc.
pub const TRAPCC_VECTOR: u8 = 7;

/// Exceptions in hardware priority order.
const PRIORITY: [(ExceptionStatus, u8); 8] = [
    (ExceptionStatus::BSUN, BSUN_VECTOR),
    (ExceptionStatus::SNAN, SNAN_VECTOR),
    (ExceptionStatus::OPERR, OPERR_VECTOR),
    (ExceptionStatus::OVFL, OVFL_VECTOR),
    (ExceptionStatus::UNFL, UNFL_VECTOR),
    (ExceptionStatus::DZ, DZ_VECTOR),
    (ExceptionStatus::INEX2, INEX_VECTOR),
    (ExceptionStatus::INEX1, INEX_VECTOR),
];

/// Returns the vector of the highest-priority exception in `pending`.
pub fn trap_vector(pending: ExceptionStatus) -> Option<u8> {
    PRIORITY.iter().find(|(exception, _)| pending.contains(*exception)).map(|&(_, vector)| vector)
}

impl<B: FpuBackend> Fpu<B> {
    /// Records the exceptions of an arithmetic instruction and checks the enables.
    pub(super) fn complete(&mut self, exceptions: ExceptionStatus, instruction_address: u32) -> Completion {
        self.context.fpsr.record(exceptions);
        self.check_enabled(exceptions, instruction_address)
    }

    /// Latches FPIAR and selects a trap vector when any of `exceptions` is enabled.
    pub(super) fn check_enabled(&mut self, exceptions: ExceptionStatus, instruction_address: u32) -> Completion {
        let enabled = exceptions & self.context.fpcr.enables();
        let Some(vector) = trap_vector(enabled) else {
            return Completion::Done;
        };
        self.context.fpiar = instruction_address;
        warn!(
            exceptions = enabled.bits(),
            vector,
            address = instruction_address,
            "enabled FPU exception"
        );
        Completion::TrapPending(vector)
    }
}
