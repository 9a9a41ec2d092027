//! Human readable renderings of exact results.
//!
//! Everything here goes through a fixed precision `Float` and is lossy; the
//! exact `Integer` stays the authoritative value.

use std::fmt;

use rug::{float, Float, Integer};

use crate::FactorialError;

/// Bits of mantissa used when converting a factorial for display.
pub const DISPLAY_PRECISION: u32 = 1 << 20;
pub const SIGNIFICANT_DIGITS: usize = 20;

pub(crate) fn check_precision(bits: u32) -> Result<u32, FactorialError> {
    if (float::prec_min()..=float::prec_max()).contains(&bits) {
        Ok(bits)
    } else {
        Err(FactorialError::invalid(bits, "float precision out of range"))
    }
}

/// A value in scientific notation: `d.ddd…e<exponent>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scientific {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Scientific {
    pub fn from_integer(
        value: &Integer,
        precision_bits: u32,
        significant_digits: usize,
    ) -> Result<Self, FactorialError> {
        let precision_bits = check_precision(precision_bits)?;
        Self::from_float(&Float::with_val(precision_bits, value), significant_digits)
    }

    pub fn from_float(value: &Float, significant_digits: usize) -> Result<Self, FactorialError> {
        if significant_digits < 2 {
            return Err(FactorialError::invalid(
                significant_digits,
                "at least two significant digits are needed",
            ));
        }
        if !value.is_finite() {
            return Err(FactorialError::invalid(value, "only finite values have digits"));
        }

        let zero = Self {
            negative: false,
            digits: "0".repeat(significant_digits),
            exponent: 0,
        };
        if value.is_zero() {
            return Ok(zero);
        }

        let (negative, digits, exp) = value.to_sign_string_exp(10, Some(significant_digits));
        Ok(match exp {
            // MPFR gives 0.DIGITS × 10^exp
            Some(exp) => Self {
                negative,
                digits,
                exponent: i64::from(exp) - 1,
            },
            None => zero,
        })
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }
}

impl fmt::Display for Scientific {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-")?;
        }
        let (lead, rest) = self.digits.split_at(1);
        write!(f, "{lead}.{rest}e{}", self.exponent)
    }
}
