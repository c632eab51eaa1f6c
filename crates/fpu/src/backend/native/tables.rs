//! Host status translation tables.

use crate::state::{ConditionCodes, ExceptionStatus};

/// x87-style classification bits produced by [`software_fxam`].
pub const C0: u16 = 0x0100;
/// Sign of the examined value.
pub const C1: u16 = 0x0200;
/// Classification bit C2.
pub const C2: u16 = 0x0400;
/// Classification bit C3.
pub const C3: u16 = 0x4000;

const FXAM_NAN: u16 = C0;
const FXAM_INFINITY: u16 = C0 | C2;
const FXAM_ZERO: u16 = C3;
const FXAM_FINITE: u16 = C2;
const FXAM_EMPTY: u16 = C0 | C3;
const FXAM_DENORMAL: u16 = C2 | C3;

/// Size of the condition table: every combination of C0, C1, C2 and C3 after folding C3
/// down next to the others.
const CONDITION_SLOTS: usize = 0x48;

const fn condition_slot(status: u16) -> usize {
    ((status >> 8) & 0x47) as usize
}

/// Classifies a double the way the x87 FXAM instruction does.
pub fn software_fxam(value: f64) -> u16 {
    let sign = if value.is_sign_negative() { C1 } else { 0 };
    let class = if value.is_nan() {
        FXAM_NAN
    } else if value.is_infinite() {
        FXAM_INFINITY
    } else if value == 0.0 {
        FXAM_ZERO
    } else if value.is_subnormal() {
        FXAM_DENORMAL
    } else {
        FXAM_FINITE
    };
    sign | class
}

/// Translation tables from host status to emulated FPSR bits, built by
/// [`HostStatusTable::initialize`].
#[derive(Debug, Clone)]
pub struct HostStatusTable {
    exceptions: [ExceptionStatus; 64],
    conditions: [ConditionCodes; CONDITION_SLOTS],
}

impl HostStatusTable {
    /// Builds every table entry.
    pub fn initialize() -> Self {
        let mut exceptions = [ExceptionStatus::NONE; 64];
        for (index, slot) in exceptions.iter_mut().enumerate() {
            *slot = ExceptionStatus::when(index & 0x01 != 0, ExceptionStatus::OPERR)
                | ExceptionStatus::when(index & 0x04 != 0, ExceptionStatus::DZ)
                | ExceptionStatus::when(index & 0x08 != 0, ExceptionStatus::OVFL)
                | ExceptionStatus::when(index & 0x10 != 0, ExceptionStatus::UNFL)
                | ExceptionStatus::when(index & 0x20 != 0, ExceptionStatus::INEX2);
        }

        let mut conditions = [ConditionCodes::NAN; CONDITION_SLOTS];
        for sign in [0, C1] {
            let n = ConditionCodes::when(sign != 0, ConditionCodes::N);
            let entries = [
                (FXAM_NAN, ConditionCodes::NAN),
                (FXAM_INFINITY, ConditionCodes::INF),
                (FXAM_ZERO, ConditionCodes::Z),
                (FXAM_FINITE, ConditionCodes::NONE),
                (FXAM_EMPTY, ConditionCodes::NAN),
                (FXAM_DENORMAL, ConditionCodes::NONE),
            ];
            for (class, codes) in entries {
                conditions[condition_slot(class | sign)] = codes | n;
            }
        }

        Self { exceptions, conditions }
    }

    /// Translates a compressed host flag index into exception status bits.
    pub fn exceptions(&self, host_index: usize) -> ExceptionStatus {
        self.exceptions[host_index & 0x3f]
    }

    /// Translates an FXAM status word into condition codes.
    pub fn conditions(&self, fxam: u16) -> ConditionCodes {
        self.conditions[condition_slot(fxam)]
    }
}
