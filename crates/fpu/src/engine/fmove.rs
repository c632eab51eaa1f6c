//! FMOVE from a data register to memory or an integer data register (class 3).

use tracing::trace;

use crate::backend::FpuBackend;
use crate::codec::{self, KFactor, OperandFormat};
use crate::common::CpuBus;

use super::operand::{self, Access, AddressingMode};
use super::{Completion, Fpu, Illegal};

impl<B: FpuBackend> Fpu<B> {
    /// Stores register `extra[9:7]` in the format of `extra[12:10]`.
    ///
    /// Condition codes are left alone; the exception byte reflects the conversion.
    pub(super) fn fmove_out(
        &mut self,
        cpu: &mut dyn CpuBus,
        opcode: u16,
        extra: u16,
        instruction_address: u32,
    ) -> Result<Completion, Illegal> {
        let format = OperandFormat::from_size((extra >> 10) & 7);
        let source = self.context.registers[usize::from((extra >> 7) & 7)];
        let k_factor = KFactor {
            value: match format {
                OperandFormat::PackedDynamic => (cpu.d_reg(usize::from((extra >> 4) & 7)) & 0x7f) as i32,
                _ => i32::from(extra & 0x7f),
            },
            honored: B::HONORS_K_FACTOR,
        };
        let mode = AddressingMode::decode(opcode);
        let fpcr_mode = self.context.fpcr.mode();

        let exceptions = match mode {
            AddressingMode::DataDirect(reg) => {
                if !format.fits_data_register() {
                    return Err(Illegal);
                }
                let (words, exceptions) = codec::encode(self.export(source), format, fpcr_mode, k_factor);
                operand::write_data_register(cpu, reg, format, words[0])?;
                exceptions
            }
            AddressingMode::AddressDirect(_) => return Err(Illegal),
            _ => {
                let target = operand::memory_operand(cpu, mode, format.byte_len(), Access::Write)?;
                let (words, exceptions) = codec::encode(self.export(source), format, fpcr_mode, k_factor);
                operand::write_words(cpu, target.addr, format, words);
                target.commit(cpu);
                if self.tracing_operands() {
                    trace!(?format, addr = target.addr, ?words, "stored operand");
                }
                exceptions
            }
        };
        Ok(self.complete(exceptions, instruction_address))
    }
}
