//! Shared test infrastructure.

pub mod bus;
pub mod harness;
pub mod mocks;
