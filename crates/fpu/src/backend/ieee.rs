//! IEEE double backend with software directed rounding.
//!
//! Arithmetic runs on host doubles in round-to-nearest. The exact rounding error of each
//! operation is recovered with error-free transforms (TwoSum for addition, fused
//! multiply-add residuals for multiplication, division and square root) and the
//! nearest result is stepped one ulp when the FPCR mode requires it. Narrower FPCR
//! precisions are applied afterwards through the software float.

use tracing::trace;

use crate::float::{Format, FpFlags, RoundingMode, SoftFloat};

use super::transcendental;
use super::{Control, Dyadic, FpuBackend, Monadic, Outcome};

/// Host-double backend with exact rounding-mode emulation.
#[derive(Debug, Default)]
pub struct IeeeBackend {
    control: Control,
}

impl IeeeBackend {
    /// Creates a backend in round-to-nearest, extended precision.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns the least double greater than `x`.
pub(crate) fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    f64::from_bits(if x > 0.0 { bits + 1 } else { bits - 1 })
}

/// Returns the greatest double less than `x`.
pub(crate) fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

/// Moves a round-to-nearest result one ulp when the exact value lies on the side that
/// the directed `mode` rounds to.
///
/// `error` carries the sign of `exact - rounded`; its magnitude is not used.
fn correct(rounded: f64, error: f64, mode: RoundingMode) -> f64 {
    if error == 0.0 || error.is_nan() || !rounded.is_finite() {
        return rounded;
    }
    match mode {
        RoundingMode::Nearest => rounded,
        RoundingMode::Zero if rounded > 0.0 && error < 0.0 => next_down(rounded),
        RoundingMode::Zero if rounded < 0.0 && error > 0.0 => next_up(rounded),
        RoundingMode::Zero => rounded,
        RoundingMode::Minus if error < 0.0 => next_down(rounded),
        RoundingMode::Plus if error > 0.0 => next_up(rounded),
        RoundingMode::Minus | RoundingMode::Plus => rounded,
    }
}

/// Rounds through the software float when `format` is narrower than a host double.
pub(crate) fn narrow(value: f64, mode: RoundingMode, format: Format) -> (f64, FpFlags) {
    let target = format.within(Format::DOUBLE);
    if target == Format::DOUBLE {
        return (value, FpFlags::NONE);
    }
    let (rounded, flags) = SoftFloat::from_f64(value).round(target, mode);
    (rounded.to_f64(mode).0, flags)
}

/// Flags a tiny nonzero result (or an inexact zero) as underflow.
pub(crate) fn underflow(value: f64, inexact: bool) -> FpFlags {
    let tiny = value != 0.0 && value.abs() < f64::MIN_POSITIVE;
    FpFlags::when(tiny || (value == 0.0 && inexact), FpFlags::UF)
}

impl IeeeBackend {
    /// Applies the directed-rounding correction, overflow policy and FPCR precision.
    fn finish(&self, nearest: f64, error: f64, operands_finite: bool) -> Outcome<f64> {
        let Control { mode, format } = self.control;
        let (value, mut flags) = if nearest.is_infinite() && operands_finite {
            let negative = nearest < 0.0;
            let value = if mode.overflows_to_infinity(negative) {
                nearest
            } else {
                f64::MAX.copysign(nearest)
            };
            (value, FpFlags::OF | FpFlags::NX)
        } else {
            let inexact = error != 0.0 && !error.is_nan();
            let value = correct(nearest, error, mode);
            (value, FpFlags::when(inexact, FpFlags::NX) | underflow(value, inexact))
        };
        let (value, narrowed) = narrow(value, mode, format);
        flags |= narrowed;
        Outcome::new(value, flags.into())
    }

    fn round_integral(&self, x: f64, mode: RoundingMode) -> Outcome<f64> {
        let value = match mode {
            RoundingMode::Nearest => x.round_ties_even(),
            RoundingMode::Zero => x.trunc(),
            RoundingMode::Minus => x.floor(),
            RoundingMode::Plus => x.ceil(),
        };
        // Keep the operand's sign on zero results (-0.4 rounds to -0).
        let value = if value == 0.0 { 0f64.copysign(x) } else { value };
        let (value, flags) = narrow(value, self.control.mode, self.control.format);
        Outcome::new(value, (flags | FpFlags::when(value != x, FpFlags::NX)).into())
    }
}

impl FpuBackend for IeeeBackend {
    type Value = f64;

    const NAME: &'static str = "ieee";

    const STORAGE: Format = Format::DOUBLE;

    fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    fn control(&self) -> Control {
        self.control
    }

    fn import(&self, value: SoftFloat) -> f64 {
        value.to_f64(self.control.mode).0
    }

    fn export(&self, value: f64) -> SoftFloat {
        SoftFloat::from_f64(value)
    }

    fn monadic(&mut self, op: Monadic, x: f64) -> Outcome<f64> {
        let Control { mode, format } = self.control;
        match op {
            Monadic::Move | Monadic::Abs | Monadic::Neg => {
                let value = match op {
                    Monadic::Abs => x.abs(),
                    Monadic::Neg => -x,
                    _ => x,
                };
                let (value, flags) = narrow(value, mode, format);
                Outcome::new(value, flags.into())
            }
            Monadic::Int => self.round_integral(x, mode),
            Monadic::IntRz => self.round_integral(x, RoundingMode::Zero),
            Monadic::Sqrt => {
                let root = x.sqrt();
                let error = (-root).mul_add(root, x);
                self.finish(root, error, true)
            }
            Monadic::GetExp => Outcome::exact(self.import(self.export(x).get_exponent())),
            Monadic::GetMan => Outcome::exact(self.import(self.export(x).get_mantissa())),
            _ => {
                let result = transcendental::evaluate(op, x);
                trace!(?op, x, result, "host transcendental");
                if result.is_nan() {
                    return Outcome::new(result, FpFlags::NV.into());
                }
                let inexact = !transcendental::is_exact(op, x, result);
                let mut flags = FpFlags::when(inexact, FpFlags::NX) | underflow(result, inexact);
                if result.is_infinite() && x.is_finite() && op != Monadic::LogNp1 {
                    flags |= FpFlags::OF | FpFlags::NX;
                }
                let (value, narrowed) = narrow(result, mode, format);
                Outcome::new(value, (flags | narrowed).into())
            }
        }
    }

    fn dyadic(&mut self, op: Dyadic, a: f64, b: f64) -> Outcome<f64> {
        let finite = a.is_finite() && b.is_finite();
        match op {
            Dyadic::Add | Dyadic::Sub => {
                let b = if op == Dyadic::Sub { -b } else { b };
                let sum = a + b;
                let bv = sum - a;
                let error = (a - (sum - bv)) + (b - bv);
                let both_positive_zero = a == 0.0 && b == 0.0 && a.is_sign_positive() && b.is_sign_positive();
                let sum = if sum == 0.0 && self.control.mode == RoundingMode::Minus && !both_positive_zero {
                    -0.0
                } else {
                    sum
                };
                self.finish(sum, error, finite)
            }
            Dyadic::Mul => {
                let product = a * b;
                let error = a.mul_add(b, -product);
                self.finish(product, error, finite)
            }
            Dyadic::Div => {
                let quotient = a / b;
                let residual = (-quotient).mul_add(b, a);
                let direction = if residual == 0.0 { 0.0 } else { residual.signum() * b.signum() };
                self.finish(quotient, direction, finite)
            }
        }
    }
}
