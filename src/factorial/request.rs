use std::{fmt, str::FromStr};

use crate::FactorialError;

const NEGATIVE: &str = "factorial is only defined for non-negative integers";

/// A validated `n` for n!.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FactorialRequest {
    n: u64,
}

impl FactorialRequest {
    pub const fn new(n: u64) -> Self {
        Self { n }
    }

    pub const fn n(self) -> u64 {
        self.n
    }
}

impl From<u64> for FactorialRequest {
    fn from(n: u64) -> Self {
        Self::new(n)
    }
}

impl From<u32> for FactorialRequest {
    fn from(n: u32) -> Self {
        Self::new(n.into())
    }
}

impl TryFrom<i64> for FactorialRequest {
    type Error = FactorialError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .map(Self::new)
            .map_err(|_| FactorialError::invalid(n, NEGATIVE))
    }
}

impl FromStr for FactorialRequest {
    type Err = FactorialError;

    /// Accepts `_` as a digit separator, so `100_000` works on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().replace('_', "");

        if let Ok(n) = digits.parse::<u64>() {
            return Ok(Self::new(n));
        }
        match digits.parse::<i128>() {
            Ok(n) if n < 0 => Err(FactorialError::invalid(s, NEGATIVE)),
            Ok(_) => Err(FactorialError::invalid(s, "n does not fit in 64 bits")),
            Err(_) => Err(FactorialError::invalid(s, "not an integer")),
        }
    }
}

impl fmt::Display for FactorialRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!", self.n)
    }
}
