//! FSAVE and FRESTORE.
//!
//! The emulated FPU has no internal pipeline state, so FSAVE always writes an idle
//! frame. FRESTORE accepts any frame: a null frame resets the FPU, every other frame is
//! skipped by the length in its header.
//!
//! | Frame          | Size | Layout                                             |
//! |----------------|------|----------------------------------------------------|
//! | Null           | 4    | `0x00000000`                                       |
//! | Idle (68040)   | 4    | `0x41000000`                                       |
//! | Idle (68881)   | 28   | `0x1f180000`, five zero longs, `0x70000000`        |
//!
//! Header byte 0 is the version (zero for null frames), byte 1 the number of bytes
//! that follow the header.

use tracing::debug;

use crate::backend::FpuBackend;
use crate::common::{CpuBus, FpuResult};

use super::operand::{self, Access, AddressingMode};
use super::{Completion, Fpu, Illegal};

/// 68040 idle frame header.
pub const IDLE_68040: u32 = 0x4100_0000;
/// 68881 idle frame header.
pub const IDLE_68881: u32 = 0x1f18_0000;
/// Last long word of a 68881 idle frame (BIU flags).
pub const IDLE_68881_TRAILER: u32 = 0x7000_0000;
/// 68881 idle frame size in bytes.
pub const IDLE_68881_SIZE: u32 = 28;

impl<B: FpuBackend> Fpu<B> {
    /// FSAVE. The program counter points past the opcode word.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FpuError::IllegalInstruction`] for `(An)+` and non-alterable
    /// destinations.
    pub fn save(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion> {
        let start = cpu.pc().wrapping_sub(2);
        let frame: &[u32] = if self.context.is_integral {
            &[IDLE_68040]
        } else {
            &[IDLE_68881, 0, 0, 0, 0, 0, IDLE_68881_TRAILER]
        };
        self.with_rewind(cpu, opcode, 0, start, |_, cpu| {
            let mode = AddressingMode::decode(opcode);
            if matches!(mode, AddressingMode::PostIncrement(_)) {
                return Err(Illegal);
            }
            let mut addr = operand::address(cpu, mode, Access::Write)?;
            let size = 4 * frame.len() as u32;
            if let AddressingMode::PreDecrement(reg) = mode {
                addr = addr.wrapping_sub(size);
                cpu.set_a_reg(reg, addr);
            }
            debug!(addr, size, "FSAVE idle frame");
            for (i, word) in frame.iter().enumerate() {
                cpu.write_long(addr.wrapping_add(4 * i as u32), *word);
            }
            Ok(Completion::Done)
        })
    }

    /// FRESTORE. The program counter points past the opcode word.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FpuError::IllegalInstruction`] for `-(An)` and register sources.
    pub fn restore(&mut self, cpu: &mut dyn CpuBus, opcode: u16) -> FpuResult<Completion> {
        let start = cpu.pc().wrapping_sub(2);
        self.with_rewind(cpu, opcode, 0, start, |fpu, cpu| {
            let mode = AddressingMode::decode(opcode);
            if matches!(mode, AddressingMode::PreDecrement(_)) {
                return Err(Illegal);
            }
            let mut addr = operand::address(cpu, mode, Access::Read)?;
            let header = cpu.read_long(addr);
            addr = addr.wrapping_add(4);
            if header >> 24 == 0 {
                debug!("FRESTORE null frame");
                fpu.reset();
            } else {
                let length = (header >> 16) & 0xff;
                debug!(header, length, "FRESTORE skipping frame");
                addr = addr.wrapping_add(length);
            }
            if let AddressingMode::PostIncrement(reg) = mode {
                cpu.set_a_reg(reg, addr);
            }
            Ok(Completion::Done)
        })
    }
}
