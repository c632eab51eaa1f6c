//! Effective-address resolution and operand transfer.

use crate::codec::OperandFormat;
use crate::common::CpuBus;

use super::Illegal;

/// Direction of an operand transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// The FPU reads the operand.
    Read,
    /// The FPU writes the operand.
    Write,
}

/// The six-bit effective-address field of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    /// `Dn`.
    DataDirect(usize),
    /// `An`.
    AddressDirect(usize),
    /// `(An)`.
    Indirect(usize),
    /// `(An)+`.
    PostIncrement(usize),
    /// `-(An)`.
    PreDecrement(usize),
    /// `(d16,An)`.
    Displacement(usize),
    /// `(d8,An,Xn)` and the 68020 full formats.
    Indexed(usize),
    /// `(xxx).W`.
    AbsoluteShort,
    /// `(xxx).L`.
    AbsoluteLong,
    /// `(d16,PC)`.
    PcDisplacement,
    /// `(d8,PC,Xn)`.
    PcIndexed,
    /// `#imm`.
    Immediate,
    /// Mode 7 with register 5..7.
    Reserved,
}

impl AddressingMode {
    /// Decodes the low six bits of an opcode.
    pub const fn decode(opcode: u16) -> Self {
        let reg = (opcode & 7) as usize;
        match (opcode >> 3) & 7 {
            0 => Self::DataDirect(reg),
            1 => Self::AddressDirect(reg),
            2 => Self::Indirect(reg),
            3 => Self::PostIncrement(reg),
            4 => Self::PreDecrement(reg),
            5 => Self::Displacement(reg),
            6 => Self::Indexed(reg),
            _ => match reg {
                0 => Self::AbsoluteShort,
                1 => Self::AbsoluteLong,
                2 => Self::PcDisplacement,
                3 => Self::PcIndexed,
                4 => Self::Immediate,
                _ => Self::Reserved,
            },
        }
    }
}

/// Address-register step for a transfer of `len` bytes. Byte transfers through A7
/// move by two to keep the stack word aligned.
pub const fn step(reg: usize, len: u32) -> u32 {
    if reg == 7 && len == 1 { 2 } else { len }
}

/// Computes the address of a memory operand, fetching any extension words.
///
/// `(An)+` and `-(An)` yield the current register value; the caller applies the
/// transfer size. Register-direct modes and `#imm` have no address here.
pub fn address(cpu: &mut dyn CpuBus, mode: AddressingMode, access: Access) -> Result<u32, Illegal> {
    match mode {
        AddressingMode::Indirect(reg)
        | AddressingMode::PostIncrement(reg)
        | AddressingMode::PreDecrement(reg) => Ok(cpu.a_reg(reg)),
        AddressingMode::Displacement(reg) => {
            let displacement = cpu.next_iword() as i16;
            Ok(cpu.a_reg(reg).wrapping_add(i32::from(displacement) as u32))
        }
        AddressingMode::Indexed(reg) => {
            let extension = cpu.next_iword();
            let base = cpu.a_reg(reg);
            Ok(cpu.indexed_ea(base, extension))
        }
        AddressingMode::AbsoluteShort => Ok(i32::from(cpu.next_iword() as i16) as u32),
        AddressingMode::AbsoluteLong => Ok(cpu.next_ilong()),
        AddressingMode::PcDisplacement if access == Access::Read => {
            let pc = cpu.pc();
            let displacement = cpu.next_iword() as i16;
            Ok(pc.wrapping_add(i32::from(displacement) as u32))
        }
        AddressingMode::PcIndexed if access == Access::Read => {
            let pc = cpu.pc();
            let extension = cpu.next_iword();
            Ok(cpu.indexed_ea(pc, extension))
        }
        _ => Err(Illegal),
    }
}

/// A resolved memory operand with its pending address-register update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct MemoryOperand {
    /// Address of the first byte.
    pub addr: u32,
    writeback: Option<(usize, u32)>,
}

impl MemoryOperand {
    /// Commits the `(An)+`/`-(An)` update after the transfer.
    pub fn commit(self, cpu: &mut dyn CpuBus) {
        if let Some((reg, value)) = self.writeback {
            cpu.set_a_reg(reg, value);
        }
    }
}

/// Resolves a memory operand of `len` bytes.
///
/// Immediate operands are read from the instruction stream; a byte immediate occupies
/// the low byte of a word.
pub fn memory_operand(
    cpu: &mut dyn CpuBus,
    mode: AddressingMode,
    len: u32,
    access: Access,
) -> Result<MemoryOperand, Illegal> {
    let (addr, writeback) = match mode {
        AddressingMode::PostIncrement(reg) => {
            let addr = cpu.a_reg(reg);
            (addr, Some((reg, addr.wrapping_add(step(reg, len)))))
        }
        AddressingMode::PreDecrement(reg) => {
            let addr = cpu.a_reg(reg).wrapping_sub(step(reg, len));
            (addr, Some((reg, addr)))
        }
        AddressingMode::Immediate if access == Access::Read => {
            let pc = cpu.pc();
            cpu.set_pc(pc.wrapping_add(step(7, len)));
            (if len == 1 { pc.wrapping_add(1) } else { pc }, None)
        }
        _ => (address(cpu, mode, access)?, None),
    };
    Ok(MemoryOperand { addr, writeback })
}

/// Reads an operand of `format` into the long-word layout used by the codec.
pub fn read_words(cpu: &mut dyn CpuBus, addr: u32, format: OperandFormat) -> [u32; 3] {
    match format.byte_len() {
        1 => [u32::from(cpu.read_byte(addr)), 0, 0],
        2 => [u32::from(cpu.read_word(addr)), 0, 0],
        4 => [cpu.read_long(addr), 0, 0],
        8 => [cpu.read_long(addr), cpu.read_long(addr.wrapping_add(4)), 0],
        _ => [
            cpu.read_long(addr),
            cpu.read_long(addr.wrapping_add(4)),
            cpu.read_long(addr.wrapping_add(8)),
        ],
    }
}

/// Writes an operand of `format` from the codec's long-word layout.
pub fn write_words(cpu: &mut dyn CpuBus, addr: u32, format: OperandFormat, words: [u32; 3]) {
    match format.byte_len() {
        1 => cpu.write_byte(addr, words[0] as u8),
        2 => cpu.write_word(addr, words[0] as u16),
        4 => cpu.write_long(addr, words[0]),
        len => {
            for (i, word) in words.iter().take(len as usize / 4).enumerate() {
                cpu.write_long(addr.wrapping_add(4 * i as u32), *word);
            }
        }
    }
}

/// Reads a source operand from a data register, narrowed to the format's width.
pub fn read_data_register(cpu: &dyn CpuBus, reg: usize, format: OperandFormat) -> Result<[u32; 3], Illegal> {
    let value = cpu.d_reg(reg);
    let value = match format {
        OperandFormat::Long | OperandFormat::Single => value,
        OperandFormat::Word => value & 0xffff,
        OperandFormat::Byte => value & 0xff,
        _ => return Err(Illegal),
    };
    Ok([value, 0, 0])
}

/// Stores an operand into a data register. Byte and word stores keep the upper bits.
pub fn write_data_register(
    cpu: &mut dyn CpuBus,
    reg: usize,
    format: OperandFormat,
    word: u32,
) -> Result<(), Illegal> {
    let old = cpu.d_reg(reg);
    let value = match format {
        OperandFormat::Long | OperandFormat::Single => word,
        OperandFormat::Word => (old & !0xffff) | (word & 0xffff),
        OperandFormat::Byte => (old & !0xff) | (word & 0xff),
        _ => return Err(Illegal),
    };
    cpu.set_d_reg(reg, value);
    Ok(())
}
