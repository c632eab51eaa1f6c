//! FMOVEM of the data registers (classes 6 and 7).
//!
//! Registers travel in the 96-bit extended format with NaN payloads untouched and no
//! signaling-NaN check. The register mask is the low byte of the extension word, or the
//! low byte of `Dn[6:4]` when bit 11 is set.
//!
//! | Direction       | Addressing  | Bit 12 | Mask bit for FPn | Order   |
//! |-----------------|-------------|--------|------------------|---------|
//! | To memory       | `-(An)`     | clear  | `1 << n`         | FP7..0  |
//! | To memory       | control     | set    | `0x80 >> n`      | FP0..7  |
//! | From memory     | `(An)+`, control | set | `0x80 >> n`    | FP0..7  |

use tracing::trace;

use crate::backend::FpuBackend;
use crate::codec::binary::{decode_extended, encode_extended};
use crate::codec::OperandFormat;
use crate::common::CpuBus;
use crate::float::RoundingMode;

use super::operand::{self, Access, AddressingMode};
use super::{Fpu, Illegal};

impl<B: FpuBackend> Fpu<B> {
    /// Memory image of a data register.
    fn extended_image(&self, index: usize) -> [u32; 3] {
        encode_extended(self.export(self.context.registers[index]), RoundingMode::Nearest).0
    }

    /// Executes a class 6/7 instruction. Bit 13 set moves registers to memory.
    pub(super) fn move_multiple(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> Result<(), Illegal> {
        let to_memory = extra & 0x2000 != 0;
        let mode = AddressingMode::decode(opcode);
        let access = if to_memory { Access::Write } else { Access::Read };
        let mut addr = operand::address(cpu, mode, access)?;
        let list = if extra & 0x800 != 0 {
            (cpu.d_reg(usize::from((extra >> 4) & 7)) & 0xff) as u8
        } else {
            extra as u8
        };
        let postincrement = extra & 0x1000 != 0;
        trace!(list, to_memory, addr, "FMOVEM");

        match (to_memory, mode) {
            (true, AddressingMode::PostIncrement(_)) | (false, AddressingMode::PreDecrement(_)) => {
                return Err(Illegal);
            }
            (true, AddressingMode::PreDecrement(reg)) => {
                if postincrement {
                    return Err(Illegal);
                }
                for index in (0..8usize).rev().filter(|&i| (list >> i) & 1 != 0) {
                    let words = self.extended_image(index);
                    addr = addr.wrapping_sub(12);
                    operand::write_words(cpu, addr, OperandFormat::Extended, words);
                }
                cpu.set_a_reg(reg, addr);
            }
            _ => {
                if !postincrement {
                    return Err(Illegal);
                }
                for index in (0..8usize).filter(|&i| (list << i) & 0x80 != 0) {
                    if to_memory {
                        let words = self.extended_image(index);
                        operand::write_words(cpu, addr, OperandFormat::Extended, words);
                    } else {
                        let words = operand::read_words(cpu, addr, OperandFormat::Extended);
                        self.context.registers[index] = self.import(decode_extended(words, false).register);
                    }
                    addr = addr.wrapping_add(12);
                }
                if let AddressingMode::PostIncrement(reg) = mode {
                    cpu.set_a_reg(reg, addr);
                }
            }
        }
        Ok(())
    }
}
