//! FMOVE/FMOVEM of the control registers (classes 4 and 5).
//!
//! Extension word bits 12:10 select FPCR (4), FPSR (2) and FPIAR (1). Registers are
//! always transferred in the order FPCR, FPSR, FPIAR, each as one long word.

use tracing::debug;

use crate::backend::FpuBackend;
use crate::common::CpuBus;
use crate::state::{ControlRegister, StatusRegister};

use super::operand::{self, Access, AddressingMode};
use super::{Fpu, Illegal};

const FPCR: u16 = 4;
const FPSR: u16 = 2;
const FPIAR: u16 = 1;

/// Transfer order.
const ORDER: [u16; 3] = [FPCR, FPSR, FPIAR];

impl<B: FpuBackend> Fpu<B> {
    fn read_control(&self, which: u16) -> u32 {
        match which {
            FPCR => self.context.fpcr.bits(),
            FPSR => self.context.fpsr.bits(),
            _ => self.context.fpiar,
        }
    }

    fn write_control(&mut self, which: u16, value: u32) {
        match which {
            FPCR => self.context.fpcr = ControlRegister::from_bits(value),
            FPSR => self.context.fpsr = StatusRegister::from_bits(value),
            _ => self.context.fpiar = value,
        }
    }

    /// Executes a class 4/5 instruction. Bit 13 set moves to the effective address.
    pub(super) fn move_control(&mut self, cpu: &mut dyn CpuBus, opcode: u16, extra: u16) -> Result<(), Illegal> {
        let list = (extra >> 10) & 7;
        if list == 0 {
            return Err(Illegal);
        }
        let to_ea = extra & 0x2000 != 0;
        let selected = ORDER.into_iter().filter(|which| list & which != 0);
        let count = selected.clone().count() as u32;
        debug!(list, to_ea, "control register move");

        match AddressingMode::decode(opcode) {
            AddressingMode::DataDirect(reg) if count == 1 => {
                if to_ea {
                    cpu.set_d_reg(reg, self.read_control(list));
                } else {
                    self.write_control(list, cpu.d_reg(reg));
                }
            }
            AddressingMode::AddressDirect(reg) if list == FPIAR => {
                if to_ea {
                    cpu.set_a_reg(reg, self.context.fpiar);
                } else {
                    self.context.fpiar = cpu.a_reg(reg);
                }
            }
            AddressingMode::Immediate if !to_ea => {
                for which in selected {
                    let value = cpu.next_ilong();
                    self.write_control(which, value);
                }
            }
            AddressingMode::DataDirect(_) | AddressingMode::AddressDirect(_) | AddressingMode::Immediate => {
                return Err(Illegal);
            }
            mode => {
                let access = if to_ea { Access::Write } else { Access::Read };
                let base = operand::address(cpu, mode, access)?;
                let start = match mode {
                    AddressingMode::PreDecrement(_) => base.wrapping_sub(count * 4),
                    _ => base,
                };
                let mut addr = start;
                for which in selected {
                    if to_ea {
                        cpu.write_long(addr, self.read_control(which));
                    } else {
                        let value = cpu.read_long(addr);
                        self.write_control(which, value);
                    }
                    addr = addr.wrapping_add(4);
                }
                match mode {
                    AddressingMode::PreDecrement(reg) => cpu.set_a_reg(reg, start),
                    AddressingMode::PostIncrement(reg) => cpu.set_a_reg(reg, addr),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
