use std::time::{Duration, Instant};

/// One measured operation, taken from the monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    start: Instant,
    end: Instant,
}

impl TimingSample {
    /// Runs `f` and records how long it took.
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Self) {
        let start = Instant::now();
        let out = f();
        let end = Instant::now();
        (out, Self { start, end })
    }

    pub fn start(&self) -> Instant {
        self.start
    }

    pub fn end(&self) -> Instant {
        self.end
    }

    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Aggregate of the rounds of a benchmark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingSummary {
    pub rounds: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub total: f64,
}

impl TimingSummary {
    pub fn from_samples(samples: &[TimingSample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let secs = samples.iter().map(TimingSample::elapsed_secs);
        let total: f64 = secs.clone().sum();
        let min = secs.clone().fold(f64::INFINITY, f64::min);
        let max = secs.fold(0., f64::max);

        Some(Self {
            rounds: samples.len(),
            min,
            max,
            mean: total / samples.len() as f64,
            total,
        })
    }
}
