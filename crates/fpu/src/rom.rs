//! On-chip constant ROM read by FMOVECR.
//!
//! The ROM offset is the low seven bits of the extension word. Defined offsets:
//!
//! | Offset | Constant  | Offset | Constant |
//! |--------|-----------|--------|----------|
//! | 0x00   | pi        | 0x32   | 10^0     |
//! | 0x0b   | log10(2)  | 0x33   | 10^1     |
//! | 0x0c   | e         | 0x34   | 10^2     |
//! | 0x0d   | log2(e)   | 0x35   | 10^4     |
//! | 0x0e   | log10(e)  | ...    | ...      |
//! | 0x0f   | 0.0       | 0x3f   | 10^4096  |
//! | 0x30   | ln(2)     |        |          |
//! | 0x31   | ln(10)    |        |          |
//!
//! Every other offset reads as `+0.0`.

use crate::float::decimal::from_decimal;
use crate::float::{Format, RoundingMode, SoftFloat};

fn extended((biased, mantissa): (u16, u64)) -> SoftFloat {
    SoftFloat::from_extended_fields(false, biased, mantissa)
}

/// Transcendental constants as rounded into the 64-bit ROM: biased exponent and mantissa.
const PI: (u16, u64) = (0x4000, 0xc90f_daa2_2168_c235);
const LOG10_2: (u16, u64) = (0x3ffd, 0x9a20_9a84_fbcf_f798);
const E: (u16, u64) = (0x4000, 0xadf8_5458_a2bb_4a9a);
const LOG2_E: (u16, u64) = (0x3fff, 0xb8aa_3b29_5c17_f0bc);
const LOG10_E: (u16, u64) = (0x3ffd, 0xde5b_d8a9_3728_7195);
const LN_2: (u16, u64) = (0x3ffe, 0xb172_17f7_d1cf_79ac);
const LN_10: (u16, u64) = (0x4000, 0x935d_8ddd_aaa8_ac17);

/// The constant ROM.
#[derive(Clone, Debug)]
pub struct ConstantRom {
    /// 10^(2^i) for i = 0..13, preceded by 10^0.
    powers_of_ten: [SoftFloat; 14],
}

impl ConstantRom {
    /// Builds the ROM. Powers of ten are computed exactly and rounded to nearest.
    pub fn new() -> Self {
        let mut powers_of_ten = [SoftFloat::from_i64(1); 14];
        for (i, slot) in powers_of_ten.iter_mut().enumerate().skip(1) {
            let exponent = 1i32 << (i - 1);
            *slot = from_decimal(false, 1, exponent, Format::EXTENDED, RoundingMode::Nearest).0;
        }
        Self { powers_of_ten }
    }

    /// Reads the constant at a ROM offset.
    pub fn get(&self, offset: u8) -> SoftFloat {
        match offset & 0x7f {
            0x00 => extended(PI),
            0x0b => extended(LOG10_2),
            0x0c => extended(E),
            0x0d => extended(LOG2_E),
            0x0e => extended(LOG10_E),
            0x30 => extended(LN_2),
            0x31 => extended(LN_10),
            i @ 0x32..=0x3f => self.powers_of_ten[usize::from(i - 0x32)],
            _ => SoftFloat::zero(false),
        }
    }
}

impl Default for ConstantRom {
    fn default() -> Self {
        Self::new()
    }
}
