use m68k_fpu::float::RoundingMode;
use m68k_fpu::{
    BackendKind, Completion, Coprocessor, FpuConfig, FpuModel, FpuRegister, FpuResult, SoftFloat, from_config,
};
use tracing_subscriber::EnvFilter;

use super::bus::TestBus;

/// Where test programs are assembled.
pub const CODE: u32 = 0x1000;
/// Scratch data area.
pub const DATA: u32 = 0x2000;
/// Initial stack pointer.
pub const STACK: u32 = 0x3000;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestContext {
    pub fpu: Box<dyn Coprocessor>,
    pub bus: TestBus,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new(BackendKind::Ieee, FpuModel::Mc68881)
    }
}

impl TestContext {
    pub fn new(backend: BackendKind, model: FpuModel) -> Self {
        init_tracing();
        let config = FpuConfig { model, backend, ..FpuConfig::default() };
        let fpu = from_config(&config).expect("backend available on the test host");
        let mut bus = TestBus::new(0x10000);
        bus.a[7] = STACK;
        Self { fpu, bus }
    }

    /// Assembles `words` (opcode, extension word, operands) at [`CODE`] and executes
    /// the general instruction.
    pub fn run(&mut self, words: &[u16]) -> FpuResult<Completion> {
        self.bus.load_words(CODE, words);
        self.bus.pc = CODE + 4;
        self.fpu.execute(&mut self.bus, words[0], words[1])
    }

    /// Like [`TestContext::run`], expecting a normal completion.
    pub fn exec(&mut self, words: &[u16]) {
        assert_eq!(self.run(words).expect("legal instruction"), Completion::Done);
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.fpu.set_register(index, FpuRegister::Number(SoftFloat::from_f64(value)));
    }

    pub fn set_nan(&mut self, index: usize, payload: u64, negative: bool) {
        self.fpu.set_register(index, FpuRegister::NaN { payload, negative });
    }

    /// Reads a register as a host double; NaNs read as `f64::NAN`.
    pub fn get(&self, index: usize) -> f64 {
        match self.fpu.register(index) {
            FpuRegister::Number(value) => value.to_f64(RoundingMode::Nearest).0,
            FpuRegister::NaN { .. } => f64::NAN,
        }
    }

    pub fn exceptions(&self) -> u32 {
        self.fpu.fpsr() & 0xff00
    }

    pub fn condition(&self) -> u32 {
        self.fpu.fpsr() & 0x0f00_0000
    }
}

/// Extension word for a register-to-register general operation.
pub const fn reg_op(src: u16, dst: u16, opmode: u16) -> u16 {
    (src << 10) | (dst << 7) | opmode
}

/// Extension word for a memory-source general operation of the given size code.
pub const fn mem_op(size: u16, dst: u16, opmode: u16) -> u16 {
    0x4000 | (size << 10) | (dst << 7) | opmode
}
