//! Shared types used across the FPU core.
//!
//! This module provides:
//! 1. **Errors:** The crate error type and the illegal-instruction path.
//! 2. **CPU Interface:** The `CpuBus` trait through which the FPU reaches the integer core.

/// Crate error type.
pub mod error;

/// Integer-CPU collaborator interface (registers, instruction stream, memory).
pub mod bus;

pub use bus::CpuBus;
pub use error::{FpuError, FpuResult};
