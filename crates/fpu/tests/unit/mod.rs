//! Unit tests grouped by instruction family.

pub mod arithmetic;
pub mod config;
pub mod constants;
pub mod control;
pub mod frame;
pub mod illegal;
pub mod movem;
pub mod nan;
pub mod operands;
pub mod packed;
