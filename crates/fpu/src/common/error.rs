//! Error definitions for the FPU core.
//!
//! This module defines the failure modes surfaced to the embedding emulator. It provides:
//! 1. **Decode Failures:** Invalid addressing-mode/size combinations and unsupported
//!    instruction variants, all routed through the m68k illegal-instruction path.
//! 2. **Setup Failures:** Configuration loading errors and backends unavailable on the host.
//!
//! Numeric exceptions (OPERR, OVFL, DZ, ...) are never errors; they are recorded in the
//! emulated status register.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type FpuResult<T> = Result<T, FpuError>;

/// Errors produced by the FPU core.
#[derive(Debug, Error)]
pub enum FpuError {
    /// The instruction cannot be executed and must raise the illegal-instruction vector.
    ///
    /// Raised for reserved size codes, writes to immediate or PC-relative operands,
    /// register lists that are not legal for the addressing mode, 68040-only opcodes
    /// on a 68881 and opcodes the engine does not implement. When this is returned
    /// the program counter has already been rewound to the start of the instruction.
    #[error("illegal FPU instruction: opcode {opcode:#06x}, extension {extra:#06x}")]
    IllegalInstruction {
        /// First instruction word.
        opcode: u16,
        /// Extension word (zero for FSAVE/FRESTORE).
        extra: u16,
    },

    /// The requested numeric backend is not available on this host.
    #[error("backend `{0}` is not supported on this host")]
    UnsupportedBackend(String),

    /// The configuration is structurally valid JSON but semantically wrong.
    #[error("invalid FPU configuration: {0}")]
    Config(String),

    /// Reading a configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a configuration document failed.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl FpuError {
    /// Builds an illegal-instruction error for the given instruction words.
    pub const fn illegal(opcode: u16, extra: u16) -> Self {
        Self::IllegalInstruction { opcode, extra }
    }

    /// Returns true if the error must be delivered to the guest as an illegal instruction.
    pub const fn is_illegal_instruction(&self) -> bool {
        matches!(self, Self::IllegalInstruction { .. })
    }
}
