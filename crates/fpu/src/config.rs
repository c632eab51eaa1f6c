//! FPU configuration.
//!
//! This module defines the settings an embedding emulator supplies when it builds an FPU.
//! It provides:
//! 1. **Defaults:** Baseline model, backend and control register values.
//! 2. **Structures:** The `FpuConfig` document and the `FpuModel` selector.
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! Every field is optional in the JSON document; missing fields take the defaults below.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::backend::BackendKind;
use crate::common::{FpuError, FpuResult};
use crate::state::ControlRegister;

/// Default configuration values.
mod defaults {
    use super::{BackendKind, FpuModel};

    /// A stand-alone 68881 coprocessor.
    pub const MODEL: FpuModel = FpuModel::Mc68881;

    /// Portable IEEE-double backend.
    pub const BACKEND: BackendKind = BackendKind::Ieee;

    /// Round to nearest, extended precision, all exceptions disabled.
    pub const FPCR: u32 = 0;
}

/// FPU model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum FpuModel {
    /// MC68881/MC68882 coprocessor: full transcendental set, 28-byte idle frames.
    #[default]
    #[serde(alias = "68881", alias = "mc68881")]
    Mc68881,
    /// MC68040 integrated FPU: FS*/FD* variants, 4-byte idle frames.
    #[serde(alias = "68040", alias = "mc68040")]
    Mc68040,
}

impl FpuModel {
    /// Returns true for the integrated 68040 FPU.
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Mc68040)
    }
}

/// Settings for building an FPU.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FpuConfig {
    /// FPU model.
    #[serde(default = "FpuConfig::default_model")]
    pub model: FpuModel,

    /// Numeric backend.
    #[serde(default = "FpuConfig::default_backend")]
    pub backend: BackendKind,

    /// FPCR value after construction.
    #[serde(default = "FpuConfig::default_fpcr")]
    pub fpcr: u32,

    /// Emit a trace event for every operand load and store.
    #[serde(default)]
    pub trace_operations: bool,
}

impl FpuConfig {
    const fn default_model() -> FpuModel {
        defaults::MODEL
    }

    const fn default_backend() -> BackendKind {
        defaults::BACKEND
    }

    const fn default_fpcr() -> u32 {
        defaults::FPCR
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::Json`] for malformed documents and [`FpuError::Config`] when
    /// the FPCR value has bits outside the writable mask.
    pub fn from_json(text: &str) -> FpuResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::Io`] when the file cannot be read, otherwise as
    /// [`FpuConfig::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> FpuResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn validate(&self) -> FpuResult<()> {
        if self.fpcr & !ControlRegister::MASK != 0 {
            return Err(FpuError::Config(format!(
                "fpcr {:#010x} sets bits outside {:#010x}",
                self.fpcr,
                ControlRegister::MASK
            )));
        }
        Ok(())
    }
}

impl Default for FpuConfig {
    fn default() -> Self {
        Self {
            model: defaults::MODEL,
            backend: defaults::BACKEND,
            fpcr: defaults::FPCR,
            trace_operations: false,
        }
    }
}
