//! Data-driven decode of general-operation opmodes.
//!
//! The low seven bits of a class 0/2 extension word select the operation. The table is
//! built once per engine and maps every opmode to a descriptor or to nothing (illegal).
//!
//! | Opmodes     | Operations                                                      |
//! |-------------|-----------------------------------------------------------------|
//! | 0x00..0x1f  | Monadic: FMOVE, FINT, FSQRT, transcendentals, FABS, FNEG, ...   |
//! | 0x20..0x28  | Dyadic: FDIV, FMOD, FADD, FMUL, FSGLDIV, FREM, FSCALE, ...      |
//! | 0x30..0x37  | FSINCOS (cosine register in bits 2:0)                           |
//! | 0x38, 0x3a  | FCMP, FTST                                                      |
//! | 0x40..0x6f  | 68040 FS*/FD* variants (bit 2 selects double)                   |

use crate::backend::{Dyadic, Monadic};
use crate::float::RemainderKind;

/// Number of opmodes addressable by the extension word.
const OPMODES: usize = 0x80;

/// What a general operation computes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneralOp {
    /// Single-operand primitive on the source.
    Monadic(Monadic),
    /// Two-operand primitive on the destination and source.
    Dyadic(Dyadic),
    /// FMOD or FREM.
    Remainder(RemainderKind),
    /// FSCALE.
    Scale,
    /// FSINCOS.
    SinCos,
    /// FCMP.
    Compare,
    /// FTST.
    Test,
}

/// Result precision of a general operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Precision selected by the FPCR.
    Fpcr,
    /// Single precision and exponent range (68040 FS* variants).
    Single,
    /// Double precision and exponent range (68040 FD* variants).
    Double,
    /// Single-precision mantissa over the extended exponent range (FSGLDIV, FSGLMUL).
    SingleMantissa,
}

/// One decoded opmode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpDescriptor {
    /// The operation.
    pub op: GeneralOp,
    /// Result precision.
    pub rounding: Rounding,
    /// Only legal on the 68040 integrated FPU.
    pub integral_only: bool,
}

impl OpDescriptor {
    const fn new(op: GeneralOp, rounding: Rounding) -> Self {
        Self { op, rounding, integral_only: false }
    }
}

/// Opmode lookup table.
#[derive(Clone, Debug)]
pub struct DispatchTable {
    entries: [Option<OpDescriptor>; OPMODES],
}

impl DispatchTable {
    /// Builds the table.
    pub fn new() -> Self {
        use GeneralOp::{Compare, Dyadic as D, Monadic as M, Remainder, Scale, SinCos, Test};

        let mut entries = [None; OPMODES];
        let general = [
            (0x00, M(Monadic::Move)),
            (0x01, M(Monadic::Int)),
            (0x02, M(Monadic::Sinh)),
            (0x03, M(Monadic::IntRz)),
            (0x04, M(Monadic::Sqrt)),
            (0x06, M(Monadic::LogNp1)),
            (0x08, M(Monadic::EtoxM1)),
            (0x09, M(Monadic::Tanh)),
            (0x0a, M(Monadic::Atan)),
            (0x0c, M(Monadic::Asin)),
            (0x0d, M(Monadic::Atanh)),
            (0x0e, M(Monadic::Sin)),
            (0x0f, M(Monadic::Tan)),
            (0x10, M(Monadic::Etox)),
            (0x11, M(Monadic::TwoToX)),
            (0x12, M(Monadic::TenToX)),
            (0x14, M(Monadic::LogN)),
            (0x15, M(Monadic::Log10)),
            (0x16, M(Monadic::Log2)),
            (0x18, M(Monadic::Abs)),
            (0x19, M(Monadic::Cosh)),
            (0x1a, M(Monadic::Neg)),
            (0x1c, M(Monadic::Acos)),
            (0x1d, M(Monadic::Cos)),
            (0x1e, M(Monadic::GetExp)),
            (0x1f, M(Monadic::GetMan)),
            (0x20, D(Dyadic::Div)),
            (0x21, Remainder(RemainderKind::Truncated)),
            (0x22, D(Dyadic::Add)),
            (0x23, D(Dyadic::Mul)),
            (0x25, Remainder(RemainderKind::Nearest)),
            (0x26, Scale),
            (0x28, D(Dyadic::Sub)),
            (0x38, Compare),
            (0x3a, Test),
        ];
        for (opmode, op) in general {
            entries[opmode] = Some(OpDescriptor::new(op, Rounding::Fpcr));
        }
        entries[0x24] = Some(OpDescriptor::new(D(Dyadic::Div), Rounding::SingleMantissa));
        entries[0x27] = Some(OpDescriptor::new(D(Dyadic::Mul), Rounding::SingleMantissa));
        for slot in &mut entries[0x30..0x38] {
            *slot = Some(OpDescriptor::new(SinCos, Rounding::Fpcr));
        }

        let integral = [
            (0x40, M(Monadic::Move)),
            (0x41, M(Monadic::Sqrt)),
            (0x58, M(Monadic::Abs)),
            (0x5a, M(Monadic::Neg)),
            (0x60, D(Dyadic::Div)),
            (0x62, D(Dyadic::Add)),
            (0x63, D(Dyadic::Mul)),
            (0x68, D(Dyadic::Sub)),
        ];
        for (opmode, op) in integral {
            for (offset, rounding) in [(0, Rounding::Single), (4, Rounding::Double)] {
                entries[opmode + offset] =
                    Some(OpDescriptor { op, rounding, integral_only: true });
            }
        }

        Self { entries }
    }

    /// Looks up an opmode. Returns `None` for reserved opmodes and for 68040-only
    /// opmodes on a 68881.
    pub fn lookup(&self, opmode: u16, is_integral: bool) -> Option<OpDescriptor> {
        self.entries[usize::from(opmode) & (OPMODES - 1)]
            .filter(|desc| is_integral || !desc.integral_only)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}
