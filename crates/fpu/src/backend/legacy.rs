//! Round-to-nearest backend with table-driven status.
//!
//! Arithmetic is plain host double arithmetic; the FPCR rounding mode only affects FINT
//! and integer stores, and the FPCR precision is ignored. Condition codes come from a
//! classification table and predicates from a 32x16 truth table, both built once when
//! the backend is created.

use crate::engine::conditions;
use crate::float::{Class, Format, FpValue, RoundingMode, SoftFloat};
use crate::state::{ConditionCodes, FpuRegister};

use super::transcendental;
use super::{Control, Dyadic, FpuBackend, Monadic, Outcome};

/// Number of classification slots: `(class << 1) | sign`.
const CLASS_SLOTS: usize = 16;

const fn class_slot(class: Class, negative: bool) -> usize {
    let class = match class {
        Class::Zero => 0,
        Class::Subnormal => 1,
        Class::Normal => 2,
        Class::Infinite => 3,
        Class::Nan => 4,
    };
    (class << 1) | negative as usize
}

/// Round-to-nearest host-double backend.
#[derive(Debug)]
pub struct LegacyBackend {
    control: Control,
    condition_table: [ConditionCodes; CLASS_SLOTS],
    predicate_table: [[bool; 16]; 32],
}

impl LegacyBackend {
    /// Creates the backend and builds its lookup tables.
    pub fn new() -> Self {
        let mut condition_table = [ConditionCodes::NONE; CLASS_SLOTS];
        for class in [Class::Zero, Class::Subnormal, Class::Normal, Class::Infinite, Class::Nan] {
            for negative in [false, true] {
                let kind = match class {
                    Class::Zero => ConditionCodes::Z,
                    Class::Infinite => ConditionCodes::INF,
                    Class::Nan => ConditionCodes::NAN,
                    Class::Normal | Class::Subnormal => ConditionCodes::NONE,
                };
                condition_table[class_slot(class, negative)] =
                    kind | ConditionCodes::when(negative, ConditionCodes::N);
            }
        }

        let mut predicate_table = [[false; 16]; 32];
        for (predicate, row) in predicate_table.iter_mut().enumerate() {
            for (nibble, cell) in row.iter_mut().enumerate() {
                *cell = conditions::evaluate(ConditionCodes::from_nibble(nibble), predicate as u8);
            }
        }

        Self { control: Control::default(), condition_table, predicate_table }
    }

    /// Rounds to an integral value the way the legacy core does: nearest is
    /// `floor(x + 0.5)`, so halfway cases round toward plus infinity.
    fn round_integral(x: f64, mode: RoundingMode) -> f64 {
        match mode {
            RoundingMode::Nearest => (x + 0.5).floor(),
            RoundingMode::Zero => {
                if x < 0.0 {
                    x.ceil()
                } else {
                    x.floor()
                }
            }
            RoundingMode::Minus => x.floor(),
            RoundingMode::Plus => x.ceil(),
        }
    }
}

impl Default for LegacyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FpuBackend for LegacyBackend {
    type Value = f64;

    const NAME: &'static str = "legacy";

    const STORAGE: Format = Format::DOUBLE;

    const HONORS_K_FACTOR: bool = false;

    fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    fn control(&self) -> Control {
        self.control
    }

    fn import(&self, value: SoftFloat) -> f64 {
        value.to_f64(RoundingMode::Nearest).0
    }

    fn export(&self, value: f64) -> SoftFloat {
        SoftFloat::from_f64(value)
    }

    fn monadic(&mut self, op: Monadic, x: f64) -> Outcome<f64> {
        let value = match op {
            Monadic::Move => x,
            Monadic::Abs => x.abs(),
            Monadic::Neg => -x,
            Monadic::Sqrt => x.sqrt(),
            Monadic::Int => Self::round_integral(x, self.control.mode),
            Monadic::IntRz => Self::round_integral(x, RoundingMode::Zero),
            Monadic::GetExp => self.import(self.export(x).get_exponent()),
            Monadic::GetMan => self.import(self.export(x).get_mantissa()),
            _ => transcendental::evaluate(op, x),
        };
        Outcome::exact(value)
    }

    fn dyadic(&mut self, op: Dyadic, a: f64, b: f64) -> Outcome<f64> {
        Outcome::exact(match op {
            Dyadic::Add => a + b,
            Dyadic::Sub => a - b,
            Dyadic::Mul => a * b,
            Dyadic::Div => a / b,
        })
    }

    fn condition_codes(&self, register: &FpuRegister<f64>) -> ConditionCodes {
        match register {
            FpuRegister::NaN { negative, .. } => self.condition_table[class_slot(Class::Nan, *negative)],
            FpuRegister::Number(value) => {
                self.condition_table[class_slot(value.class(), value.is_sign_negative())]
            }
        }
    }

    fn test_predicate(&self, condition: ConditionCodes, predicate: u8) -> bool {
        self.predicate_table[usize::from(predicate & 0x1f)][condition.nibble() & 0xf]
    }
}
