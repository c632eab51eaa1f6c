//! The FPU register file.

use std::fmt;

use super::control::ControlRegister;
use super::register::FpuRegister;
use super::status::{ConditionCodes, StatusRegister};

/// Complete programmer-visible FPU state.
#[derive(Clone, PartialEq)]
pub struct FpuContext<T> {
    /// Data registers FP0..FP7.
    pub registers: [FpuRegister<T>; 8],
    /// Control register.
    pub fpcr: ControlRegister,
    /// Status register.
    pub fpsr: StatusRegister,
    /// Address of the last instruction that raised an enabled exception.
    pub fpiar: u32,
    /// True for the 68040 integrated FPU (selects FSAVE frame layout and the FS*/FD*
    /// instruction variants).
    pub is_integral: bool,
}

impl<T: Copy> FpuContext<T> {
    /// Builds the reset state: every data register holds the default NaN and the control
    /// registers are zero.
    pub fn new(is_integral: bool) -> Self {
        Self {
            registers: [FpuRegister::default_nan(); 8],
            fpcr: ControlRegister::default(),
            fpsr: StatusRegister::default(),
            fpiar: 0,
            is_integral,
        }
    }

    /// Restores the reset state. The FPU model is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.is_integral);
    }
}

impl<T: fmt::Debug> fmt::Debug for FpuContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Multi-line register dump used by trace output.
impl<T: fmt::Debug> fmt::Display for FpuContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reg) in self.registers.iter().enumerate() {
            writeln!(f, "FP{i}: {reg:?}")?;
        }
        let cc = self.fpsr.condition;
        writeln!(
            f,
            "FPCR: {:08x}  FPSR: {:08x}  FPIAR: {:08x}",
            self.fpcr.bits(),
            self.fpsr.bits(),
            self.fpiar
        )?;
        write!(
            f,
            "N={} Z={} I={} NAN={}",
            u8::from(cc.contains(ConditionCodes::N)),
            u8::from(cc.contains(ConditionCodes::Z)),
            u8::from(cc.contains(ConditionCodes::INF)),
            u8::from(cc.contains(ConditionCodes::NAN)),
        )
    }
}
