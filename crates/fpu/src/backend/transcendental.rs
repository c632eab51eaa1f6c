//! Host-double evaluation of the transcendental primitives.
//!
//! Host math libraries do not report whether a result was rounded, so inexactness is
//! decided by a fixed rule per operation:
//!
//! | Operation                          | Exact when            |
//! |------------------------------------|-----------------------|
//! | FACOS                              | result is zero        |
//! | FETOX, FTWOTOX, FTENTOX, FLOG*     | result is an integer  |
//! | every other transcendental         | operand is zero       |

use super::Monadic;

/// Evaluates a transcendental primitive in host double precision.
///
/// Non-transcendental operations return the operand unchanged.
pub fn evaluate(op: Monadic, x: f64) -> f64 {
    match op {
        Monadic::Sinh => x.sinh(),
        Monadic::LogNp1 => x.ln_1p(),
        Monadic::EtoxM1 => x.exp_m1(),
        Monadic::Tanh => x.tanh(),
        Monadic::Atan => x.atan(),
        Monadic::Asin => x.asin(),
        Monadic::Atanh => x.atanh(),
        Monadic::Sin => x.sin(),
        Monadic::Tan => x.tan(),
        Monadic::Etox => x.exp(),
        Monadic::TwoToX => x.exp2(),
        Monadic::TenToX => 10f64.powf(x),
        Monadic::LogN => x.ln(),
        Monadic::Log10 => x.log10(),
        Monadic::Log2 => x.log2(),
        Monadic::Cosh => x.cosh(),
        Monadic::Acos => x.acos(),
        Monadic::Cos => x.cos(),
        Monadic::Move
        | Monadic::Int
        | Monadic::IntRz
        | Monadic::Sqrt
        | Monadic::Abs
        | Monadic::Neg
        | Monadic::GetExp
        | Monadic::GetMan => x,
    }
}

/// Applies the exactness rule to an already classified operand and result.
pub fn exact_by_rule(
    op: Monadic,
    operand_is_zero: bool,
    result_is_zero: bool,
    result_is_integral: bool,
) -> bool {
    match op {
        Monadic::Acos => result_is_zero,
        Monadic::Etox
        | Monadic::TwoToX
        | Monadic::TenToX
        | Monadic::LogN
        | Monadic::Log10
        | Monadic::Log2 => result_is_integral,
        _ => operand_is_zero,
    }
}

/// Decides whether a host-double transcendental result is reported as exact.
pub fn is_exact(op: Monadic, x: f64, result: f64) -> bool {
    let integral = result.is_finite() && result.fract() == 0.0;
    exact_by_rule(op, x == 0.0, result == 0.0, integral)
}
