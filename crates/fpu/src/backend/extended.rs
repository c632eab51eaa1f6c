//! Software extended-precision backend.
//!
//! Register values are [`SoftFloat`]s and every arithmetic primitive is correctly rounded
//! into the format selected by the FPCR: extended, or single/double with their own
//! exponent ranges so results overflow and underflow where the IEEE format does.
//! FSGLMUL/FSGLDIV alone keep the extended range with a 24-bit mantissa.
//!
//! Transcendental functions are evaluated in host double precision with argument
//! reduction so the full extended exponent range is covered: exponentials are split
//! into an integral power of two applied with [`SoftFloat::scale`], logarithms into
//! mantissa and exponent.

use crate::float::{FpFlags, FpValue, RemainderKind, RoundingMode, SoftFloat};

use super::transcendental;
use super::{Control, Dyadic, FpuBackend, Monadic, Outcome};

/// Exact software extended-precision backend.
#[derive(Debug, Default)]
pub struct ExtendedBackend {
    control: Control,
}

impl ExtendedBackend {
    /// Creates a backend in round-to-nearest, extended precision.
    pub fn new() -> Self {
        Self::default()
    }

    fn finish(&self, (value, flags): (SoftFloat, FpFlags)) -> Outcome<SoftFloat> {
        Outcome::new(value, flags.into())
    }

    /// Computes `2^y` as `2^frac(y) * 2^round(y)`, rounding once into the current format.
    fn exp2_scaled(&self, y: f64) -> (SoftFloat, FpFlags) {
        let Control { mode, format } = self.control;
        if y.is_nan() {
            return (SoftFloat::nan(), FpFlags::NV);
        }
        // Beyond this the result over- or underflows any format.
        let k = y.round().clamp(-40_000.0, 40_000.0);
        let base = SoftFloat::from_f64((y - k).exp2());
        base.scale(k as i32, format, mode)
    }

    /// Evaluates a transcendental function with extended-range argument reduction.
    fn transcendental(&self, op: Monadic, x: SoftFloat) -> Outcome<SoftFloat> {
        let Control { mode, format } = self.control;
        let (xd, _) = x.to_f64(RoundingMode::Nearest);
        let (value, mut flags) = match op {
            Monadic::Etox => self.exp2_scaled(xd * std::f64::consts::LOG2_E),
            Monadic::TwoToX => self.exp2_scaled(xd),
            Monadic::TenToX => self.exp2_scaled(xd * std::f64::consts::LOG2_10),
            Monadic::Cosh | Monadic::Sinh if xd.abs() > 700.0 => {
                // e^|x| / 2 dominates; sinh keeps the operand sign.
                let (magnitude, flags) =
                    self.exp2_scaled(xd.abs() * std::f64::consts::LOG2_E - 1.0);
                let negative = op == Monadic::Sinh && x.negative();
                (magnitude.with_sign(negative), flags)
            }
            Monadic::LogN | Monadic::Log10 | Monadic::Log2 => match x.exponent() {
                Some(exp) => {
                    let (mantissa, _) = x.get_mantissa().to_f64(RoundingMode::Nearest);
                    let exp = f64::from(exp);
                    let result = match op {
                        Monadic::LogN => mantissa.ln() + exp * std::f64::consts::LN_2,
                        Monadic::Log10 => mantissa.log10() + exp * std::f64::consts::LOG10_2,
                        _ => mantissa.log2() + exp,
                    };
                    SoftFloat::from_f64(result).round(format, mode)
                }
                None => SoftFloat::from_f64(transcendental::evaluate(op, xd)).round(format, mode),
            },
            _ => SoftFloat::from_f64(transcendental::evaluate(op, xd)).round(format, mode),
        };
        if value.is_nan() {
            return Outcome::new(SoftFloat::nan(), FpFlags::NV.into());
        }
        let integral = value.round_to_integral(RoundingMode::Nearest).1.is_empty();
        if !transcendental::exact_by_rule(op, x.is_zero(), value.is_zero(), integral) {
            flags |= FpFlags::NX;
        }
        Outcome::new(value, flags.into())
    }
}

impl FpuBackend for ExtendedBackend {
    type Value = SoftFloat;

    const NAME: &'static str = "extended";

    fn set_control(&mut self, control: Control) {
        self.control = control;
    }

    fn control(&self) -> Control {
        self.control
    }

    fn import(&self, value: SoftFloat) -> SoftFloat {
        value
    }

    fn export(&self, value: SoftFloat) -> SoftFloat {
        value
    }

    fn monadic(&mut self, op: Monadic, x: SoftFloat) -> Outcome<SoftFloat> {
        let Control { mode, format } = self.control;
        match op {
            Monadic::Move => self.finish(x.round(format, mode)),
            Monadic::Abs => self.finish(x.abs().round(format, mode)),
            Monadic::Neg => self.finish(x.neg().round(format, mode)),
            Monadic::Sqrt => self.finish(x.sqrt(format, mode)),
            Monadic::Int | Monadic::IntRz => {
                let integral_mode = if op == Monadic::Int { mode } else { RoundingMode::Zero };
                let (integral, flags) = x.round_to_integral(integral_mode);
                let (value, narrowed) = integral.round(format, mode);
                self.finish((value, flags | narrowed))
            }
            Monadic::GetExp => self.finish(x.get_exponent().round(format, mode)),
            Monadic::GetMan => self.finish(x.get_mantissa().round(format, mode)),
            _ => self.transcendental(op, x),
        }
    }

    fn dyadic(&mut self, op: Dyadic, a: SoftFloat, b: SoftFloat) -> Outcome<SoftFloat> {
        let Control { mode, format } = self.control;
        self.finish(match op {
            Dyadic::Add => a.add(b, format, mode),
            Dyadic::Sub => a.sub(b, format, mode),
            Dyadic::Mul => a.mul(b, format, mode),
            Dyadic::Div => a.div(b, format, mode),
        })
    }

    fn remainder(
        &mut self,
        dst: SoftFloat,
        src: SoftFloat,
        kind: RemainderKind,
    ) -> (Outcome<SoftFloat>, u8) {
        let Control { mode, format } = self.control;
        let (value, quotient, flags) = dst.remainder(src, kind, format, mode);
        (Outcome::new(value, flags.into()), quotient)
    }
}
