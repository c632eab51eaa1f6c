//! The instruction engine.
//!
//! [`Fpu`] executes coprocessor instructions against an [`FpuContext`] using a numeric
//! [`FpuBackend`]. The integer core fetches the opcode and extension word and hands
//! them over; the engine decodes the operation class (extension word bits 15:13):
//!
//! | Class | Instruction group                         | Handler            |
//! |-------|-------------------------------------------|--------------------|
//! | 0, 2  | General arithmetic, FMOVECR               | [`general`]        |
//! | 3     | FMOVE to memory or data register          | [`fmove`]          |
//! | 4, 5  | FMOVE/FMOVEM of FPCR, FPSR, FPIAR          | [`control`]        |
//! | 6, 7  | FMOVEM of data registers                  | [`movem`]          |
//!
//! FSAVE/FRESTORE ([`frame`]) and the conditional instructions ([`conditions`]) have
//! their own entry points.
//!
//! Illegal encodings rewind the program counter to the start of the instruction and
//! return [`FpuError::IllegalInstruction`]; nothing is written before the encoding
//! is known to be legal.

/// Conditional predicates, FBcc, FDBcc, FScc and FTRAPcc.
pub mod conditions;

/// FMOVE/FMOVEM of the control registers.
pub mod control;

/// Opmode decode table.
pub mod dispatch;

/// Exception enables and trap vectors.
pub mod exceptions;

/// FMOVE to memory.
pub mod fmove;

/// FSAVE and FRESTORE.
pub mod frame;

/// General arithmetic and FMOVECR.
pub mod general;

/// FMOVEM of the data registers.
pub mod movem;

/// Effective-address resolution.
pub mod operand;

use std::fmt;

use tracing::{debug, debug_span, warn};

use crate::backend::extended::ExtendedBackend;
use crate::backend::ieee::IeeeBackend;
use crate::backend::legacy::LegacyBackend;
use crate::backend::{BackendKind, Control, FpuBackend};
use crate::common::{CpuBus, FpuError, FpuResult};
use crate::config::FpuConfig;
use crate::float::SoftFloat;
use crate::rom::ConstantRom;
use crate::state::{ControlRegister, FpuContext, FpuRegister, StatusRegister};

use self::dispatch::DispatchTable;

/// Marker for an encoding that must raise the illegal-instruction vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Illegal;

/// How an instruction finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The instruction completed normally.
    Done,
    /// The instruction completed and the integer core should take the given exception
    /// vector (an enabled FPU exception, or TRAPcc for FTRAPcc).
    TrapPending(u8),
}

/// Object-safe view of an engine, used when the backend is chosen at runtime.
pub trait Coprocessor: fmt::Debug {
    /// Executes a general coprocessor instruction (FPU opcode `0xf200` group).
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for illegal encodings.
    fn execute(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion>;

    /// FBcc.
    fn branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, pc: u32, displacement: u32) -> Completion;

    /// FDBcc.
    fn decrement_and_branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> Completion;

    /// FScc.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for illegal destinations.
    fn set_on_condition(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion>;

    /// FTRAPcc.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for a reserved operand mode.
    fn trap_on_condition(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion>;

    /// FSAVE.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for illegal destinations.
    fn save(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion>;

    /// FRESTORE.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for illegal sources.
    fn restore(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion>;

    /// Resets the FPU state.
    fn reset(&mut self);

    /// Returns the FPCR.
    fn fpcr(&self) -> u32;

    /// Writes the FPCR.
    fn set_fpcr(&mut self, value: u32);

    /// Returns the FPSR.
    fn fpsr(&self) -> u32;

    /// Writes the FPSR.
    fn set_fpsr(&mut self, value: u32);

    /// Returns a data register converted to the software representation.
    fn register(&self, index: usize) -> FpuRegister<SoftFloat>;

    /// Overwrites a data register from the software representation.
    fn set_register(&mut self, index: usize, value: FpuRegister<SoftFloat>);

    /// Returns a printable register dump.
    fn dump(&self) -> String;
}

/// The FPU instruction engine over a backend `B`.
pub struct Fpu<B: FpuBackend> {
    backend: B,
    context: FpuContext<B::Value>,
    rom: ConstantRom,
    dispatch: DispatchTable,
    trace_operations: bool,
}

impl<B: FpuBackend> fmt::Debug for Fpu<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fpu")
            .field("backend", &B::NAME)
            .field("is_integral", &self.context.is_integral)
            .field("fpcr", &format_args!("{:#010x}", self.context.fpcr.bits()))
            .field("fpsr", &format_args!("{:#010x}", self.context.fpsr.bits()))
            .finish_non_exhaustive()
    }
}

impl<B: FpuBackend> Fpu<B> {
    /// Creates an engine in the reset state.
    ///
    /// # Arguments
    ///
    /// * `backend` - Numeric strategy.
    /// * `is_integral` - True for the 68040 integrated FPU, false for a 68881.
    pub fn new(backend: B, is_integral: bool) -> Self {
        debug!(backend = B::NAME, is_integral, "creating FPU");
        Self {
            backend,
            context: FpuContext::new(is_integral),
            rom: ConstantRom::new(),
            dispatch: DispatchTable::new(),
            trace_operations: false,
        }
    }

    /// Enables per-operand trace events.
    #[must_use]
    pub fn with_trace(mut self, trace_operations: bool) -> Self {
        self.trace_operations = trace_operations;
        self
    }

    /// Returns the register file.
    pub const fn context(&self) -> &FpuContext<B::Value> {
        &self.context
    }

    /// Returns the register file for direct modification (debuggers, state loading).
    pub fn context_mut(&mut self) -> &mut FpuContext<B::Value> {
        &mut self.context
    }

    /// Returns the backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Resets every register to the default NaN and clears FPCR, FPSR and FPIAR.
    pub fn reset(&mut self) {
        debug!("FPU reset");
        self.context.reset();
    }

    /// Whether operand traffic is traced.
    pub(crate) const fn tracing_operands(&self) -> bool {
        self.trace_operations || cfg!(feature = "always-trace")
    }

    /// Selects the backend rounding controls for the current FPCR.
    pub(crate) fn apply_fpcr(&mut self) {
        let fpcr = self.context.fpcr;
        self.backend.set_control(Control { mode: fpcr.mode(), format: fpcr.format() });
    }

    /// Converts a software register into the backend representation.
    pub(crate) fn import(&self, register: FpuRegister<SoftFloat>) -> FpuRegister<B::Value> {
        match register {
            FpuRegister::Number(value) => FpuRegister::Number(self.backend.import(value)),
            FpuRegister::NaN { payload, negative } => FpuRegister::NaN { payload, negative },
        }
    }

    /// Converts a backend register into the software representation.
    pub(crate) fn export(&self, register: FpuRegister<B::Value>) -> FpuRegister<SoftFloat> {
        match register {
            FpuRegister::Number(value) => FpuRegister::Number(self.backend.export(value)),
            FpuRegister::NaN { payload, negative } => FpuRegister::NaN { payload, negative },
        }
    }

    /// Executes a general coprocessor instruction.
    ///
    /// The program counter must point past the extension word.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::IllegalInstruction`] for illegal encodings, after rewinding
    /// the program counter to the opcode.
    pub fn execute(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion> {
        let start = cpu.pc().wrapping_sub(4);
        let _span = debug_span!("fpu_op", opcode, extra, pc = start).entered();
        self.with_rewind(cpu, opcode, extra, start, |fpu, cpu| match extra >> 13 {
            0 | 2 => fpu.general(cpu, opcode, extra, start),
            3 => fpu.fmove_out(cpu, opcode, extra, start),
            4 | 5 => fpu.move_control(cpu, opcode, extra).map(|()| Completion::Done),
            6 | 7 => fpu.move_multiple(cpu, opcode, extra).map(|()| Completion::Done),
            _ => Err(Illegal),
        })
    }

    /// Runs an instruction body, converting [`Illegal`] into a rewound program counter
    /// and an error.
    pub(crate) fn with_rewind(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
        start: u32,
        body: impl FnOnce(&mut Self, &mut dyn CpuBus) -> Result<Completion, Illegal>,
    ) -> FpuResult<Completion> {
        body(self, cpu).map_err(|Illegal| {
            warn!(opcode, extra, pc = start, "illegal FPU instruction");
            cpu.set_pc(start);
            FpuError::illegal(opcode, extra)
        })
    }
}

impl<B: FpuBackend> Coprocessor for Fpu<B> {
    fn execute(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion> {
        Self::execute(self, cpu, opcode, extra)
    }

    fn branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, pc: u32, displacement: u32) -> Completion {
        Self::branch(self, cpu, opcode, pc, displacement)
    }

    fn decrement_and_branch(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> Completion {
        Self::decrement_and_branch(self, cpu, opcode, extra)
    }

    fn set_on_condition(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion> {
        Self::set_on_condition(self, cpu, opcode, extra)
    }

    fn trap_on_condition(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> FpuResult<Completion> {
        Self::trap_on_condition(self, cpu, opcode, extra)
    }

    fn save(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion> {
        Self::save(self, cpu, opcode)
    }

    fn restore(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion> {
        Self::restore(self, cpu, opcode)
    }

    fn reset(&mut self) {
        Self::reset(self);
    }

    fn fpcr(&self) -> u32 {
        self.context.fpcr.bits()
    }

    fn set_fpcr(&mut self, value: u32) {
        self.context.fpcr = ControlRegister::from_bits(value);
    }

    fn fpsr(&self) -> u32 {
        self.context.fpsr.bits()
    }

    fn set_fpsr(&mut self, value: u32) {
        self.context.fpsr = StatusRegister::from_bits(value);
    }

    fn register(&self, index: usize) -> FpuRegister<SoftFloat> {
        self.export(self.context.registers[index & 7])
    }

    fn set_register(&mut self, index: usize, value: FpuRegister<SoftFloat>) {
        self.context.registers[index & 7] = self.import(value);
    }

    fn dump(&self) -> String {
        self.context.to_string()
    }
}

/// Builds an engine with the backend and model named by a configuration.
///
/// # Errors
///
/// Returns [`FpuError::UnsupportedBackend`] when the native backend is requested on a
/// host (or build) without it.
pub fn from_config(config: &FpuConfig) -> FpuResult<Box<dyn Coprocessor>> {
    let is_integral = config.model.is_integral();
    let mut fpu: Box<dyn Coprocessor> = match config.backend {
        BackendKind::Ieee => Box::new(Fpu::new(IeeeBackend::new(), is_integral).with_trace(config.trace_operations)),
        BackendKind::Legacy => {
            Box::new(Fpu::new(LegacyBackend::new(), is_integral).with_trace(config.trace_operations))
        }
        BackendKind::Extended => {
            Box::new(Fpu::new(ExtendedBackend::new(), is_integral).with_trace(config.trace_operations))
        }
        BackendKind::Native => native(is_integral, config.trace_operations)?,
    };
    fpu.set_fpcr(config.fpcr);
    debug!(backend = ?config.backend, model = ?config.model, "FPU configured");
    Ok(fpu)
}

#[cfg(all(feature = "native", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
fn native(is_integral: bool, trace_operations: bool) -> FpuResult<Box<dyn Coprocessor>> {
    let backend = crate::backend::native::NativeBackend::new()?;
    Ok(Box::new(Fpu::new(backend, is_integral).with_trace(trace_operations)))
}

#[cfg(not(all(feature = "native", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64"))))]
fn native(_is_integral: bool, _trace_operations: bool) -> FpuResult<Box<dyn Coprocessor>> {
    Err(FpuError::UnsupportedBackend("native".to_owned()))
}
