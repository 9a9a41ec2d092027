use rug::{float::Constant, Float};

use crate::{display::check_precision, FactorialError};

pub const DEFAULT_PRECISION: u32 = 256;

/// pi rounded to nearest at `precision_bits` of mantissa.
#[tracing::instrument(level = "debug")]
pub fn pi(precision_bits: u32) -> Result<Float, FactorialError> {
    let precision_bits = check_precision(precision_bits)?;
    Ok(Float::with_val(precision_bits, Constant::Pi))
}

/// Base 10 with as many digits as the precision can tell apart.
pub fn format_pi(pi: &Float) -> String {
    pi.to_string_radix(10, None)
}
