//! Exact factorials and fixed precision pi on top of GMP/MPFR (via `rug`),
//! with per-round timing.

pub mod accumulator;
pub mod display;
mod error;
pub mod estimate;
pub mod factorial;
pub mod pi;
pub mod timing;

pub use accumulator::Accumulator;
pub use error::FactorialError;
pub use factorial::{compute, timed_compute, FactorialEngine, FactorialRequest};
pub use timing::{TimingSample, TimingSummary};
