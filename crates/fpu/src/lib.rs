//! MC68881/68040 floating-point coprocessor emulation core.
//!
//! This crate implements the FPU half of a 68k emulator with the following:
//! 1. **State:** FP0-FP7, FPCR, FPSR and FPIAR, with NaN payloads kept outside the numeric value.
//! 2. **Codec:** The seven operand formats (integers, single, double, extended, packed decimal).
//! 3. **Engine:** Decode and execution of every coprocessor instruction class, including
//!    conditionals, FMOVEM and FSAVE/FRESTORE.
//! 4. **Backends:** Interchangeable numeric strategies (IEEE double, legacy, host
//!    floating-point environment, exact extended).
//! 5. **Configuration:** Model, backend and initial control state loaded from JSON.

/// Numeric backends.
pub mod backend;
/// Operand formats and their conversion to and from register values.
pub mod codec;
/// Errors and the integer-CPU interface.
pub mod common;
/// FPU configuration (model, backend, initial FPCR).
pub mod config;
/// Instruction decode and execution.
pub mod engine;
/// Floating-point primitives (flags, rounding, software float, decimal conversion).
pub mod float;
/// FMOVECR constant ROM.
pub mod rom;
/// Architectural register state.
pub mod state;

/// Numeric strategy selector used by the configuration.
pub use crate::backend::BackendKind;
/// Collaborator interface the host emulator implements for its integer core.
pub use crate::common::{CpuBus, FpuError, FpuResult};
/// Configuration types; use `FpuConfig::default()` or load from JSON.
pub use crate::config::{FpuConfig, FpuModel};
/// The instruction engine and its object-safe interface.
pub use crate::engine::{Completion, Coprocessor, Fpu, from_config};
/// Software extended-precision value used for register inspection.
pub use crate::float::SoftFloat;
/// A data register value or NaN with its payload.
pub use crate::state::FpuRegister;
