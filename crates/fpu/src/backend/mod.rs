//! Numeric backends.
//!
//! A backend owns the numeric representation of register values and evaluates the
//! arithmetic and transcendental primitives. The engine resolves operands, applies the
//! special-case policy (NaN propagation, domain errors, infinity arithmetic) and stores
//! results; the backend is only asked for primitives on numeric operands.
//!
//! Four strategies are provided:
//! 1. **IEEE** ([`ieee::IeeeBackend`]): host doubles with software directed rounding.
//! 2. **Legacy** ([`legacy::LegacyBackend`]): host doubles in round-to-nearest with
//!    table-driven condition codes and predicates.
//! 3. **Native** ([`native::NativeBackend`]): host doubles evaluated under the host
//!    floating-point environment, with host status translated through lookup tables.
//! 4. **Extended** ([`extended::ExtendedBackend`]): the exact 64-bit software float.

/// Software extended-precision backend.
pub mod extended;

/// IEEE double backend with software directed rounding.
pub mod ieee;

/// Round-to-nearest table-driven backend.
pub mod legacy;

/// Host floating-point environment backend.
#[cfg(all(feature = "native", any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
pub mod native;

/// Transcendental evaluation shared by the double-based backends.
pub mod transcendental;

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;

use crate::engine::conditions;
use crate::float::{Format, FpValue, RemainderKind, RoundingMode, SoftFloat};
use crate::state::{ConditionCodes, ExceptionStatus, FpuRegister};

/// Single-operand primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Monadic {
    /// FMOVE: round into the current format.
    Move,
    /// FINT: round to integral in the current mode.
    Int,
    /// FINTRZ: round to integral toward zero.
    IntRz,
    /// FSQRT.
    Sqrt,
    /// FABS.
    Abs,
    /// FNEG.
    Neg,
    /// FSINH.
    Sinh,
    /// FLOGNP1: ln(1 + x).
    LogNp1,
    /// FETOXM1: e^x - 1.
    EtoxM1,
    /// FTANH.
    Tanh,
    /// FATAN.
    Atan,
    /// FASIN.
    Asin,
    /// FATANH.
    Atanh,
    /// FSIN.
    Sin,
    /// FTAN.
    Tan,
    /// FETOX: e^x.
    Etox,
    /// FTWOTOX: 2^x.
    TwoToX,
    /// FTENTOX: 10^x.
    TenToX,
    /// FLOGN: ln(x).
    LogN,
    /// FLOG10.
    Log10,
    /// FLOG2.
    Log2,
    /// FCOSH.
    Cosh,
    /// FACOS.
    Acos,
    /// FCOS.
    Cos,
    /// FGETEXP.
    GetExp,
    /// FGETMAN.
    GetMan,
}

impl Monadic {
    /// Returns true for the operations computed through host transcendental functions.
    pub const fn is_transcendental(self) -> bool {
        !matches!(
            self,
            Self::Move | Self::Int | Self::IntRz | Self::Sqrt | Self::Abs | Self::Neg | Self::GetExp | Self::GetMan
        )
    }
}

/// Two-operand primitives. Operands are `(destination, source)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dyadic {
    /// FDIV: dst / src.
    Div,
    /// FADD.
    Add,
    /// FMUL.
    Mul,
    /// FSUB: dst - src.
    Sub,
}

/// Rounding controls in effect for one operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Control {
    /// Rounding direction.
    pub mode: RoundingMode,
    /// Target precision and exponent range.
    pub format: Format,
}

impl Default for Control {
    fn default() -> Self {
        Self { mode: RoundingMode::Nearest, format: Format::EXTENDED }
    }
}

/// Result of a primitive and the exceptions it raised.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outcome<V> {
    /// The rounded result.
    pub value: V,
    /// Exceptions raised by the primitive (OPERR, OVFL, UNFL, DZ, INEX2).
    pub status: ExceptionStatus,
}

impl<V> Outcome<V> {
    /// Wraps a result with its exceptions.
    pub const fn new(value: V, status: ExceptionStatus) -> Self {
        Self { value, status }
    }

    /// Wraps an exact result.
    pub const fn exact(value: V) -> Self {
        Self { value, status: ExceptionStatus::NONE }
    }
}

/// Backend selector used by configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// [`ieee::IeeeBackend`].
    #[default]
    Ieee,
    /// [`legacy::LegacyBackend`].
    Legacy,
    /// `native::NativeBackend`.
    Native,
    /// [`extended::ExtendedBackend`].
    Extended,
}

/// A numeric strategy for the FPU engine.
pub trait FpuBackend: fmt::Debug {
    /// Representation of numeric register contents.
    type Value: FpValue;

    /// Short name for logs.
    const NAME: &'static str;

    /// Widest format [`FpuBackend::Value`] holds exactly. Software results are rounded
    /// into it before [`FpuBackend::import`] so that its overflow and underflow are
    /// reported.
    const STORAGE: Format = Format::EXTENDED;

    /// Whether packed stores honor the k-factor. Backends that do not always produce
    /// 17 significant digits rounded to nearest.
    const HONORS_K_FACTOR: bool = true;

    /// Selects the rounding controls for the following primitives.
    fn set_control(&mut self, control: Control);

    /// Returns the rounding controls last selected.
    fn control(&self) -> Control;

    /// Converts a software value into the backend representation.
    fn import(&self, value: SoftFloat) -> Self::Value;

    /// Converts a backend value into a software value. Must be exact.
    fn export(&self, value: Self::Value) -> SoftFloat;

    /// Evaluates a single-operand primitive on a numeric operand.
    fn monadic(&mut self, op: Monadic, src: Self::Value) -> Outcome<Self::Value>;

    /// Evaluates a two-operand primitive on numeric operands.
    fn dyadic(&mut self, op: Dyadic, dst: Self::Value, src: Self::Value) -> Outcome<Self::Value>;

    /// Computes the FMOD/FREM remainder of finite nonzero operands and the low seven
    /// quotient bits.
    fn remainder(
        &mut self,
        dst: Self::Value,
        src: Self::Value,
        kind: RemainderKind,
    ) -> (Outcome<Self::Value>, u8) {
        let Control { mode, format } = self.control();
        let format = format.within(Self::STORAGE);
        let (value, quotient, flags) =
            self.export(dst).remainder(self.export(src), kind, format, mode);
        (Outcome::new(self.import(value), flags.into()), quotient)
    }

    /// Multiplies a finite destination by `2^factor`.
    fn scale(&mut self, dst: Self::Value, factor: i32) -> Outcome<Self::Value> {
        let Control { mode, format } = self.control();
        let (value, flags) = self.export(dst).scale(factor, format.within(Self::STORAGE), mode);
        Outcome::new(self.import(value), flags.into())
    }

    /// Orders two numeric values.
    fn compare(&self, dst: Self::Value, src: Self::Value) -> Option<Ordering> {
        self.export(dst).compare(self.export(src))
    }

    /// Computes condition codes for a register.
    fn condition_codes(&self, register: &FpuRegister<Self::Value>) -> ConditionCodes {
        ConditionCodes::of(register)
    }

    /// Evaluates one of the 32 conditional predicates (without BSUN side effects).
    fn test_predicate(&self, condition: ConditionCodes, predicate: u8) -> bool {
        conditions::evaluate(condition, predicate)
    }
}
