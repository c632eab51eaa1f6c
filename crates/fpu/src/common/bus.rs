//! Integer-CPU collaborator interface.
//!
//! The FPU never owns CPU state. Everything it needs from the integer core (data and
//! address registers, the program counter, the instruction stream and memory) is reached
//! through [`CpuBus`]. Memory is big-endian, as on the 68k; implementations decide how bus
//! faults are handled.

/// Access to the integer CPU, its instruction stream and its memory.
pub trait CpuBus {
    /// Returns data register `Dn`.
    fn d_reg(&self, n: usize) -> u32;

    /// Writes data register `Dn`.
    fn set_d_reg(&mut self, n: usize, value: u32);

    /// Returns address register `An` (A7 is the active stack pointer).
    fn a_reg(&self, n: usize) -> u32;

    /// Writes address register `An`.
    fn set_a_reg(&mut self, n: usize, value: u32);

    /// Returns the current program counter.
    fn pc(&self) -> u32;

    /// Sets the program counter.
    fn set_pc(&mut self, pc: u32);

    /// Fetches the next instruction-stream word and advances the program counter by 2.
    fn next_iword(&mut self) -> u16;

    /// Fetches the next instruction-stream long word and advances the program counter by 4.
    fn next_ilong(&mut self) -> u32 {
        let hi = u32::from(self.next_iword());
        let lo = u32::from(self.next_iword());
        (hi << 16) | lo
    }

    /// Reads a byte from memory.
    fn read_byte(&mut self, addr: u32) -> u8;

    /// Reads a big-endian word from memory.
    fn read_word(&mut self, addr: u32) -> u16;

    /// Reads a big-endian long word from memory.
    fn read_long(&mut self, addr: u32) -> u32;

    /// Writes a byte to memory.
    fn write_byte(&mut self, addr: u32, value: u8);

    /// Writes a big-endian word to memory.
    fn write_word(&mut self, addr: u32, value: u16);

    /// Writes a big-endian long word to memory.
    fn write_long(&mut self, addr: u32, value: u32);

    /// Computes a 68020 indexed effective address (brief or full extension format).
    ///
    /// # Arguments
    ///
    /// * `base` - Base register value (`An` or the PC of the extension word).
    /// * `extension` - The first index extension word; the implementation fetches any
    ///   further displacement words from the instruction stream.
    fn indexed_ea(&mut self, base: u32, extension: u16) -> u32;
}
