#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FactorialError {
    #[error("invalid input `{input}`: {reason}")]
    InvalidInput { input: String, reason: &'static str },
    #[error("cannot grow the accumulator to {bits} bits")]
    AllocationFailure { bits: u64 },
}

impl FactorialError {
    pub(crate) fn invalid(input: impl ToString, reason: &'static str) -> Self {
        Self::InvalidInput {
            input: input.to_string(),
            reason,
        }
    }
}
