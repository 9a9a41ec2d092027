//! Size estimates for n! that don't need n! itself.

use std::f64::consts::{LN_10, LN_2, PI};

// below this the series is summed term by term
const EXACT_SUM_BELOW: u64 = 32;

/// Extra bits reserved on top of the Stirling estimate.
pub const RESERVE_SLACK_BITS: u64 = 64;

/// ln(n!) by Stirling's series, summed exactly for small n.
pub fn ln_factorial(n: u64) -> f64 {
    if n < EXACT_SUM_BELOW {
        return (2..=n).map(|i| (i as f64).ln()).sum();
    }

    let n = n as f64;
    n * n.ln() - n + 0.5 * (2. * PI * n).ln() + 1. / (12. * n) - 1. / (360. * n * n * n)
}

pub fn log2_factorial(n: u64) -> f64 {
    ln_factorial(n) / LN_2
}

pub fn log10_factorial(n: u64) -> f64 {
    ln_factorial(n) / LN_10
}

/// ⌊log10 n!⌋ + 1, saturating at `u64::MAX`.
pub fn estimated_decimal_digits(n: u64) -> u64 {
    (log10_factorial(n).floor() as u64).saturating_add(1)
}

/// Upper bound on the bit length of n!, used to size the accumulator.
///
/// Saturates at `u64::MAX` once n! no longer has a 64-bit bit count.
pub fn estimated_bits(n: u64) -> u64 {
    (log2_factorial(n).ceil() as u64).saturating_add(RESERVE_SLACK_BITS)
}

/// Number of trailing decimal zeros of n!, by Legendre's formula for the
/// power of 5 dividing it.
pub fn trailing_zeros(n: u64) -> u64 {
    let mut zeros = 0;
    let mut power = 5u64;
    while power <= n {
        zeros += n / power;
        power = match power.checked_mul(5) {
            Some(next) => next,
            None => break,
        };
    }
    zeros
}
