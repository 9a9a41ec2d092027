//! Exact n! by repeated multiplication into a reusable accumulator.

mod request;

pub use request::FactorialRequest;

use rug::Integer;
use tracing::{debug, info};

use crate::{estimate, Accumulator, FactorialError, TimingSample};

/// Sets `accumulator` to n!, multiplying 1·2·…·n in increasing order.
///
/// Whatever the accumulator held before is overwritten. On error it holds no
/// meaningful value.
#[tracing::instrument(level = "debug", skip_all, fields(n = request.n()))]
pub fn compute<A: Accumulator>(
    request: FactorialRequest,
    accumulator: &mut A,
) -> Result<(), FactorialError> {
    let n = request.n();

    accumulator.assign_u64(1);
    accumulator.try_reserve_bits(estimate::estimated_bits(n))?;

    for i in 1..=n {
        accumulator.mul_assign_u64(i);
    }

    debug!(bits = accumulator.significant_bits(), "done multiplying");
    Ok(())
}

/// [`compute`] measured on the monotonic clock.
pub fn timed_compute<A: Accumulator>(
    request: FactorialRequest,
    accumulator: &mut A,
) -> Result<TimingSample, FactorialError> {
    let (result, sample) = TimingSample::measure(|| compute(request, accumulator));
    result.map(|()| sample)
}

/// Owns one accumulator and reuses it for every computation.
#[derive(Debug)]
pub struct FactorialEngine<A = Integer> {
    accumulator: A,
    max_bits: Option<u64>,
    computed: Option<FactorialRequest>,
}

impl<A: Accumulator> Default for FactorialEngine<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Accumulator> FactorialEngine<A> {
    pub fn new() -> Self {
        Self::with_accumulator(A::default())
    }

    /// Uses caller-provided storage. Its current value is not a result.
    pub fn with_accumulator(accumulator: A) -> Self {
        Self {
            accumulator,
            max_bits: None,
            computed: None,
        }
    }

    /// Refuse any n whose factorial is estimated to need more than `bits`.
    pub fn with_max_bits(mut self, bits: u64) -> Self {
        self.max_bits = Some(bits);
        self
    }

    pub fn max_bits(&self) -> Option<u64> {
        self.max_bits
    }

    fn check_budget(&self, request: FactorialRequest) -> Result<(), FactorialError> {
        let bits = estimate::estimated_bits(request.n());
        match self.max_bits {
            Some(max) if bits > max => {
                debug!(bits, max, "over budget");
                Err(FactorialError::AllocationFailure { bits })
            }
            _ => Ok(()),
        }
    }

    pub fn compute(&mut self, request: FactorialRequest) -> Result<&A, FactorialError> {
        self.timed_compute(request)?;
        Ok(&self.accumulator)
    }

    pub fn timed_compute(
        &mut self,
        request: FactorialRequest,
    ) -> Result<TimingSample, FactorialError> {
        self.computed = None;
        self.check_budget(request)?;

        let sample = timed_compute(request, &mut self.accumulator)?;
        self.computed = Some(request);

        Ok(sample)
    }

    /// Computes the same factorial `rounds` times back to back, calling
    /// `on_round` after each one.
    pub fn bench(
        &mut self,
        request: FactorialRequest,
        rounds: usize,
        mut on_round: impl FnMut(usize, &TimingSample),
    ) -> Result<Vec<TimingSample>, FactorialError> {
        let mut samples = Vec::with_capacity(rounds);

        for round in 0..rounds {
            let sample = self.timed_compute(request)?;
            info!(round, %request, secs = sample.elapsed_secs(), "round finished");
            on_round(round, &sample);
            samples.push(sample);
        }

        Ok(samples)
    }

    /// The last successful computation, if the accumulator holds one.
    pub fn result(&self) -> Option<(FactorialRequest, &A)> {
        self.computed.map(|request| (request, &self.accumulator))
    }

    pub fn into_result(self) -> Option<A> {
        self.computed.map(|_| self.accumulator)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use rug::{Assign, Integer};

    use super::{compute, timed_compute, FactorialEngine, FactorialRequest};
    use crate::{estimate, Accumulator, FactorialError};

    fn factorial(n: u64) -> Integer {
        let mut acc = Integer::new();
        compute(n.into(), &mut acc).expect("n is small");
        acc
    }

    #[test]
    fn known_values() {
        for (n, expected) in [
            (0, "1"),
            (1, "1"),
            (2, "2"),
            (5, "120"),
            (10, "3628800"),
            (20, "2432902008176640000"),
            (25, "15511210043330985984000000"),
        ] {
            assert_eq!(factorial(n).to_string(), expected, "{n}! (right = expected)");
        }
    }

    #[test]
    fn matches_library_factorial() {
        for n in [0u32, 1, 7, 64, 333, 1000, 4321] {
            let expected = Integer::from(Integer::factorial(n));
            assert_eq!(factorial(n.into()), expected, "{n}! (right = expected)");
        }
    }

    #[test]
    fn strictly_increasing_after_one() {
        let mut previous = factorial(1);
        for n in 2..200 {
            let current = factorial(n);
            assert!(current > previous, "{n}! should exceed {}!", n - 1);
            previous = current;
        }
        assert_eq!(factorial(0), factorial(1));
    }

    #[test]
    fn reused_accumulator_is_overwritten() {
        let mut acc = Integer::new();
        acc.assign(-12345);

        compute(30u64.into(), &mut acc).unwrap();
        let first = acc.clone();
        compute(30u64.into(), &mut acc).unwrap();
        assert_eq!(acc, first);

        compute(3u64.into(), &mut acc).unwrap();
        assert_eq!(acc, 6);
    }

    #[test]
    fn timed_compute_reports_finite_time() {
        let mut acc = Integer::new();
        let sample = timed_compute(2000u64.into(), &mut acc).unwrap();
        assert!(sample.elapsed_secs() >= 0. && sample.elapsed_secs().is_finite());
        assert_eq!(acc, Integer::from(Integer::factorial(2000)));
    }

    #[test]
    fn hundred_thousand_over_five_rounds() {
        let request = FactorialRequest::new(100_000);
        let mut engine = FactorialEngine::<Integer>::new();
        let mut seen = Vec::new();

        let samples = engine
            .bench(request, 5, |round, _| seen.push(round))
            .unwrap();

        assert_eq!(seen, [0, 1, 2, 3, 4]);
        assert_eq!(samples.len(), 5);
        for sample in &samples {
            let secs = sample.elapsed_secs();
            assert!(secs.is_finite() && secs >= 0., "bad timing {secs}");
        }

        let (computed, value) = engine.result().expect("bench succeeded");
        assert_eq!(computed, request);

        let digits = value.to_decimal_string();
        assert_eq!(digits.len(), 456_574);
        assert_eq!(digits.len() as u64, estimate::estimated_decimal_digits(100_000));
        assert!(digits.starts_with("28242"));
        let zeros = digits.bytes().rev().take_while(|&b| b == b'0').count();
        assert_eq!(zeros as u64, estimate::trailing_zeros(100_000));
    }

    #[test]
    fn over_budget_fails_without_result() {
        let mut engine = FactorialEngine::<Integer>::new().with_max_bits(1 << 10);

        engine.compute(100u64.into()).unwrap();
        assert!(engine.result().is_some());

        let err = engine.compute(10_000u64.into()).unwrap_err();
        assert!(matches!(err, FactorialError::AllocationFailure { bits } if bits > 1 << 10));
        assert!(engine.result().is_none());
        assert!(engine.into_result().is_none());
    }

    #[test]
    fn u64_max_is_over_any_budget() {
        let mut engine = FactorialEngine::<Integer>::new().with_max_bits(1 << 10);
        assert_eq!(
            engine.compute(u64::MAX.into()).unwrap_err(),
            FactorialError::AllocationFailure { bits: u64::MAX }
        );

        let mut unbounded = FactorialEngine::<Integer>::new();
        assert_eq!(
            unbounded.compute(u64::MAX.into()).unwrap_err(),
            FactorialError::AllocationFailure { bits: u64::MAX }
        );
        assert!(unbounded.result().is_none());
    }

    #[test]
    fn engine_result_survives_into_result() {
        let mut engine = FactorialEngine::<Integer>::default();
        engine.compute(20u64.into()).unwrap();
        assert_eq!(engine.into_result(), Some(Integer::from(2432902008176640000u64)));
    }

    /// Counts multiplications so tests can see what the engine did.
    #[derive(Default)]
    struct Counting {
        value: Integer,
        muls: usize,
    }

    impl Accumulator for Counting {
        fn assign_u64(&mut self, value: u64) {
            self.value.assign(value);
        }

        fn mul_assign_u64(&mut self, factor: u64) {
            self.muls += 1;
            self.value *= factor;
        }

        fn try_reserve_bits(&mut self, bits: u64) -> Result<(), FactorialError> {
            self.value.try_reserve_bits(bits)
        }

        fn significant_bits(&self) -> u64 {
            self.value.significant_bits() as u64
        }

        fn to_decimal_string(&self) -> String {
            self.value.to_string()
        }
    }

    #[test]
    fn multiplies_once_per_factor() {
        let mut engine = FactorialEngine::<Counting>::new();

        engine.compute(0u64.into()).unwrap();
        assert_eq!(engine.result().unwrap().1.muls, 0);

        let value = engine.compute(12u64.into()).unwrap();
        assert_eq!(value.muls, 12);
        assert_eq!(value.value, 479001600);
    }

    #[test]
    fn negative_input_never_reaches_the_accumulator() {
        let mut engine = FactorialEngine::<Counting>::new();
        let err = FactorialRequest::try_from(-1i64)
            .and_then(|request| engine.compute(request).map(|_| ()))
            .unwrap_err();

        assert!(matches!(err, FactorialError::InvalidInput { .. }));
        assert!(engine.result().is_none());
        assert_eq!(engine.into_result().map(|c| c.muls), None);
    }

    /// Refuses to grow past `CAP_BITS`; counts multiplications in a shared cell.
    #[derive(Default)]
    struct Capped {
        value: Integer,
        muls: Rc<Cell<usize>>,
    }

    const CAP_BITS: u64 = 1 << 10;

    impl Accumulator for Capped {
        fn assign_u64(&mut self, value: u64) {
            self.value.assign(value);
        }

        fn mul_assign_u64(&mut self, factor: u64) {
            self.muls.set(self.muls.get() + 1);
            self.value *= factor;
        }

        fn try_reserve_bits(&mut self, bits: u64) -> Result<(), FactorialError> {
            if bits > CAP_BITS {
                return Err(FactorialError::AllocationFailure { bits });
            }
            self.value.try_reserve_bits(bits)
        }

        fn significant_bits(&self) -> u64 {
            self.value.significant_bits() as u64
        }

        fn to_decimal_string(&self) -> String {
            self.value.to_string()
        }
    }

    #[test]
    fn refused_reservation_stops_before_multiplying() {
        let muls = Rc::new(Cell::new(0));
        let mut engine = FactorialEngine::with_accumulator(Capped {
            value: Integer::new(),
            muls: Rc::clone(&muls),
        });

        let err = engine.compute(10_000u64.into()).map(|_| ()).unwrap_err();
        assert!(matches!(err, FactorialError::AllocationFailure { bits } if bits > CAP_BITS));
        assert_eq!(muls.get(), 0);
        assert!(engine.result().is_none());

        engine.compute(100u64.into()).unwrap();
        assert_eq!(muls.get(), 100);
        assert!(engine.result().is_some());

        let err = engine.compute(10_000u64.into()).map(|_| ()).unwrap_err();
        assert!(matches!(err, FactorialError::AllocationFailure { .. }));
        assert_eq!(muls.get(), 100, "no multiplication after the refusal");
        assert!(engine.result().is_none());
        assert!(engine.into_result().is_none());
    }

    /// Base 10^9 limbs, least significant first. Shares no code with GMP.
    #[derive(Default)]
    struct DecimalLimbs(Vec<u32>);

    const LIMB_BASE: u128 = 1_000_000_000;

    impl Accumulator for DecimalLimbs {
        fn assign_u64(&mut self, mut value: u64) {
            self.0.clear();
            while value > 0 {
                self.0.push((value % LIMB_BASE as u64) as u32);
                value /= LIMB_BASE as u64;
            }
        }

        fn mul_assign_u64(&mut self, factor: u64) {
            let mut carry = 0u128;
            for limb in &mut self.0 {
                let product = *limb as u128 * factor as u128 + carry;
                *limb = (product % LIMB_BASE) as u32;
                carry = product / LIMB_BASE;
            }
            while carry > 0 {
                self.0.push((carry % LIMB_BASE) as u32);
                carry /= LIMB_BASE;
            }
            while self.0.last() == Some(&0) {
                self.0.pop();
            }
        }

        fn try_reserve_bits(&mut self, bits: u64) -> Result<(), FactorialError> {
            // a limb holds just under 30 bits
            let limbs = (bits / 29 + 1) as usize;
            self.0
                .try_reserve(limbs)
                .map_err(|_| FactorialError::AllocationFailure { bits })
        }

        // approximate, from the decimal length
        fn significant_bits(&self) -> u64 {
            (self.to_decimal_string().len() as f64 * std::f64::consts::LOG2_10).ceil() as u64
        }

        fn to_decimal_string(&self) -> String {
            let Some((top, rest)) = self.0.split_last() else {
                return "0".into();
            };
            let mut s = top.to_string();
            for limb in rest.iter().rev() {
                s.push_str(&format!("{limb:09}"));
            }
            s
        }
    }

    #[test]
    fn independent_backend_agrees_with_gmp() {
        let mut limbs = FactorialEngine::<DecimalLimbs>::new();
        let mut gmp = FactorialEngine::<Integer>::new();

        for n in [0u64, 1, 5, 13, 100, 1234] {
            let expected = gmp.compute(n.into()).unwrap().to_decimal_string();
            let actual = limbs.compute(n.into()).unwrap().to_decimal_string();
            assert_eq!(actual, expected, "{n}! (right = expected)");
        }
    }

    #[test]
    fn engines_on_separate_threads_agree() {
        use rayon::prelude::*;

        let parallel: Vec<Integer> = (0..16u64)
            .into_par_iter()
            .map(|i| {
                let mut engine = FactorialEngine::<Integer>::new();
                engine.compute((500 + i).into()).unwrap();
                engine.into_result().unwrap()
            })
            .collect();

        for (i, value) in parallel.iter().enumerate() {
            assert_eq!(*value, factorial(500 + i as u64), "{}! (right = expected)", 500 + i);
        }
    }
}
