use m68k_fpu::CpuBus;
use mockall::mock;

mock! {
    pub Cpu {}
    impl CpuBus for Cpu {
        fn d_reg(&self, n: usize) -> u32;
        fn set_d_reg(&mut self, n: usize, value: u32);
        fn a_reg(&self, n: usize) -> u32;
        fn set_a_reg(&mut self, n: usize, value: u32);
        fn pc(&self) -> u32;
        fn set_pc(&mut self, pc: u32);
        fn next_iword(&mut self) -> u16;
        fn next_ilong(&mut self) -> u32;
        fn read_byte(&mut self, addr: u32) -> u8;
        fn read_word(&mut self, addr: u32) -> u16;
        fn read_long(&mut self, addr: u32) -> u32;
        fn write_byte(&mut self, addr: u32, value: u8);
        fn write_word(&mut self, addr: u32, value: u16);
        fn write_long(&mut self, addr: u32, value: u32);
        fn indexed_ea(&mut self, base: u32, extension: u16) -> u32;
    }
}
