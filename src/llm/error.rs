use std::fmt;
use thiserror::Error;

/// Coarse failure class driving the backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    RateLimit,
    Timeout,
    Service,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::RateLimit => "rate_limit",
            FailureKind::Timeout => "timeout",
            FailureKind::Service => "api_error",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single completion attempt
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    #[error("rate limited by upstream: {0}")]
    RateLimited(String),

    #[error("upstream call timed out: {0}")]
    Timeout(String),

    #[error("upstream service error (status {status:?}): {message}")]
    Service {
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl CompletionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CompletionError::RateLimited(_) => FailureKind::RateLimit,
            CompletionError::Timeout(_) => FailureKind::Timeout,
            CompletionError::Service { .. } => FailureKind::Service,
            CompletionError::Unexpected(_) => FailureKind::Unexpected,
        }
    }

    /// Only failures inside the upstream-service taxonomy are retried
    pub fn is_retryable(&self) -> bool {
        self.kind() != FailureKind::Unexpected
    }
}

/// Definitive failure after the retry loop gave up
#[derive(Debug, Clone, PartialEq, Error)]
#[error("completion failed after {attempts} attempt(s): {last_error}")]
pub struct CompletionFailure {
    pub attempts: u32,
    #[source]
    pub last_error: CompletionError,
}

impl CompletionFailure {
    pub fn kind(&self) -> FailureKind {
        self.last_error.kind()
    }
}
