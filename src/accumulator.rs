//! The big-integer storage the factorial loop multiplies into.
//!
//! Construction (`Default`) and release (`Drop`) follow the owning value, so
//! storage is freed on every exit path, including a failed computation.

use rug::{Assign, Integer};

use crate::FactorialError;

const LIMB_BITS: u64 = u64::BITS as u64;

/// Arbitrary precision integer that a factorial can be accumulated into.
pub trait Accumulator: Default {
    /// Overwrites the current value.
    fn assign_u64(&mut self, value: u64);

    fn mul_assign_u64(&mut self, factor: u64);

    /// Makes room for a value of at least `bits` bits, or reports that the
    /// host cannot provide it.
    fn try_reserve_bits(&mut self, bits: u64) -> Result<(), FactorialError>;

    fn significant_bits(&self) -> u64;

    fn to_decimal_string(&self) -> String;
}

/// Asks the allocator for `bits` worth of limbs without aborting on failure.
///
/// GMP aborts the process when it cannot allocate, so the probe has to happen
/// before the integer itself grows.
pub(crate) fn probe_allocation(bits: u64) -> Result<usize, FactorialError> {
    let failure = FactorialError::AllocationFailure { bits };
    let limbs = usize::try_from(bits.div_ceil(LIMB_BITS)).map_err(|_| failure.clone())?;
    let bits = usize::try_from(bits).map_err(|_| failure.clone())?;

    let mut probe: Vec<u64> = Vec::new();
    probe.try_reserve_exact(limbs).map_err(|_| failure)?;

    Ok(bits)
}

impl Accumulator for Integer {
    fn assign_u64(&mut self, value: u64) {
        self.assign(value);
    }

    fn mul_assign_u64(&mut self, factor: u64) {
        *self *= factor;
    }

    fn try_reserve_bits(&mut self, bits: u64) -> Result<(), FactorialError> {
        let bits = probe_allocation(bits)?;
        self.reserve(bits);
        Ok(())
    }

    fn significant_bits(&self) -> u64 {
        Integer::significant_bits(self) as u64
    }

    fn to_decimal_string(&self) -> String {
        self.to_string_radix(10)
    }
}
