use m68k_fpu::CpuBus;

/// Flat big-endian RAM plus the integer register file.
pub struct TestBus {
    pub d: [u32; 8],
    pub a: [u32; 8],
    pub pc: u32,
    pub memory: Vec<u8>,
}

impl TestBus {
    pub fn new(size: usize) -> Self {
        Self { d: [0; 8], a: [0; 8], pc: 0, memory: vec![0; size] }
    }

    fn index(&self, addr: u32) -> usize {
        addr as usize % self.memory.len()
    }

    /// Writes instruction words starting at `addr`.
    pub fn load_words(&mut self, addr: u32, words: &[u16]) {
        for (i, word) in words.iter().enumerate() {
            self.write_word(addr + 2 * i as u32, *word);
        }
    }

    pub fn read_longs(&mut self, addr: u32, count: usize) -> Vec<u32> {
        (0..count).map(|i| self.read_long(addr + 4 * i as u32)).collect()
    }
}

impl CpuBus for TestBus {
    fn d_reg(&self, n: usize) -> u32 {
        self.d[n]
    }

    fn set_d_reg(&mut self, n: usize, value: u32) {
        self.d[n] = value;
    }

    fn a_reg(&self, n: usize) -> u32 {
        self.a[n]
    }

    fn set_a_reg(&mut self, n: usize, value: u32) {
        self.a[n] = value;
    }

    fn pc(&self) -> u32 {
        self.pc
    }

    fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
    }

    fn next_iword(&mut self) -> u16 {
        let word = self.read_word(self.pc);
        self.pc = self.pc.wrapping_add(2);
        word
    }

    fn read_byte(&mut self, addr: u32) -> u8 {
        self.memory[self.index(addr)]
    }

    fn read_word(&mut self, addr: u32) -> u16 {
        (u16::from(self.read_byte(addr)) << 8) | u16::from(self.read_byte(addr.wrapping_add(1)))
    }

    fn read_long(&mut self, addr: u32) -> u32 {
        (u32::from(self.read_word(addr)) << 16) | u32::from(self.read_word(addr.wrapping_add(2)))
    }

    fn write_byte(&mut self, addr: u32, value: u8) {
        let i = self.index(addr);
        self.memory[i] = value;
    }

    fn write_word(&mut self, addr: u32, value: u16) {
        self.write_byte(addr, (value >> 8) as u8);
        self.write_byte(addr.wrapping_add(1), value as u8);
    }

    fn write_long(&mut self, addr: u32, value: u32) {
        self.write_word(addr, (value >> 16) as u16);
        self.write_word(addr.wrapping_add(2), value as u16);
    }

    /// Brief extension format only: `d8(base, Xn.size*scale)`.
    fn indexed_ea(&mut self, base: u32, extension: u16) -> u32 {
        let reg = usize::from((extension >> 12) & 7);
        let raw = if extension & 0x8000 != 0 { self.a[reg] } else { self.d[reg] };
        let index = if extension & 0x800 != 0 { raw } else { raw as u16 as i16 as i32 as u32 };
        let scale = (extension >> 9) & 3;
        let displacement = extension as u8 as i8 as i32 as u32;
        base.wrapping_add(index << scale).wrapping_add(displacement)
    }
}
