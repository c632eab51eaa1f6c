//! Host floating-point environment backend.
//!
//! Every primitive runs on host doubles with the host rounding direction set from the
//! FPCR. Exception status is read back from the host flags and translated through
//! [`tables::HostStatusTable`]; condition codes come from an FXAM-style classification.
//! The host environment is saved before and restored after each primitive.

/// Host `fenv` bindings.
pub mod fenv;

/// Host status translation tables.
pub mod tables;

use std::hint::black_box;

use tracing::{debug, trace};

use crate::common::{FpuError, FpuResult};
use crate::float::{Format, FpFlags, SoftFloat};
use crate::state::{ConditionCodes, ExceptionStatus, FpuRegister};

use self::fenv::HostFpGuard;
use self::tables::{software_fxam, HostStatusTable};
use super::ieee::{narrow, underflow};
use super::transcendental;
use super::{Control, Dyadic, FpuBackend, Monadic, Outcome};

/// Backend that evaluates primitives in the host floating-point environment.
#[derive(Debug)]
pub struct NativeBackend {
    control: Control,
    tables: HostStatusTable,
}

impl NativeBackend {
    /// Creates the backend after checking that the host accepts every rounding direction.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::UnsupportedBackend`] when the host rejects a rounding mode.
    pub fn new() -> FpuResult<Self> {
        let _guard = HostFpGuard::enter();
        for round in [fenv::FE_TONEAREST, fenv::FE_TOWARDZERO, fenv::FE_DOWNWARD, fenv::FE_UPWARD] {
            if !fenv::set_round(round) || fenv::get_round() != round {
                return Err(FpuError::UnsupportedBackend(format!(
                    "host rejected rounding mode {round:#x}"
                )));
            }
        }
        debug!("native backend ready");
        Ok(Self { control: Control::default(), tables: HostStatusTable::initialize() })
    }

    /// Runs `f` under the FPCR rounding mode and returns its result with the translated
    /// host exceptions.
    fn run(&self, f: impl FnOnce() -> f64) -> (f64, ExceptionStatus) {
        let _guard = HostFpGuard::enter();
        let _ = fenv::set_round(fenv::host_round(self.control.mode));
        fenv::clear(fenv::FE_ALL_EXCEPT);
        let value = black_box(f());
        let raised = fenv::test(fenv::FE_ALL_EXCEPT);
        (value, self.tables.exceptions(fenv::host_index(raised)))
    }

    /// Applies the FPCR precision to a host result.
    fn finish(&self, value: f64, status: ExceptionStatus) -> Outcome<f64> {
        let (value, narrowed) = narrow(value, self.control.mode, self.control.format);
        Outcome::new(value, status | narrowed.into())
    }
}

impl FpuBackend for NativeBackend {
    type Value = f64;

    const NAME: &'static str = "native";

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
        match op {
            Monadic::Move => self.finish(x, ExceptionStatus::NONE),
            Monadic::Abs => self.finish(x.abs(), ExceptionStatus::NONE),
            Monadic::Neg => self.finish(-x, ExceptionStatus::NONE),
            Monadic::Sqrt => {
                let (value, status) = self.run(|| black_box(x).sqrt());
                self.finish(value, status)
            }
            Monadic::Int => {
                let (value, status) = self.run(|| fenv::round_integral(black_box(x)));
                let inexact = ExceptionStatus::when(value != x, ExceptionStatus::INEX2);
                self.finish(value, (status & ExceptionStatus::OPERR) | inexact)
            }
            Monadic::IntRz => {
                let value = x.trunc();
                let value = if value == 0.0 { 0f64.copysign(x) } else { value };
                self.finish(value, ExceptionStatus::when(value != x, ExceptionStatus::INEX2))
            }
            Monadic::GetExp => Outcome::exact(self.import(self.export(x).get_exponent())),
            Monadic::GetMan => Outcome::exact(self.import(self.export(x).get_mantissa())),
            _ => {
                let (result, status) = self.run(|| transcendental::evaluate(op, black_box(x)));
                trace!(?op, x, result, status = status.bits(), "host transcendental");
                if result.is_nan() {
                    return Outcome::new(result, ExceptionStatus::OPERR);
                }
                // libm does not report inexactness reliably.
                let inexact = !transcendental::is_exact(op, x, result);
                let flags = FpFlags::when(inexact, FpFlags::NX) | underflow(result, inexact);
                let status = (status & (ExceptionStatus::OVFL | ExceptionStatus::DZ)) | flags.into();
                self.finish(result, status)
            }
        }
    }

    fn dyadic(&mut self, op: Dyadic, a: f64, b: f64) -> Outcome<f64> {
        let (value, status) = self.run(|| {
            let (a, b) = (black_box(a), black_box(b));
            match op {
                Dyadic::Add => a + b,
                Dyadic::Sub => a - b,
                Dyadic::Mul => a * b,
                Dyadic::Div => a / b,
            }
        });
        self.finish(value, status)
    }

    fn condition_codes(&self, register: &FpuRegister<f64>) -> ConditionCodes {
        match register {
            FpuRegister::Number(value) => self.tables.conditions(software_fxam(*value)),
            FpuRegister::NaN { negative, .. } => {
                ConditionCodes::NAN | ConditionCodes::when(*negative, ConditionCodes::N)
            }
        }
    }
}
