//! Retry state for upstream calls.
//!
//! The attempt counter and current backoff travel together in a
//! [`RetryState`] value that the search loop advances after each
//! retryable failure.

use std::fmt;
use std::time::Duration;

use crate::config::RetryPolicy;

/// Why an attempt failed in a way worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// HTTP 429.
    RateLimited,
    /// HTTP status >= 500.
    ServerError(u16),
    /// The attempt hit the request timeout.
    Timeout,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "429 Too Many Requests"),
            Self::ServerError(status) => write!(f, "server error {status}"),
            Self::Timeout => write!(f, "timed out"),
        }
    }
}

/// Position in the retry sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryState {
    attempt: u32,
    backoff: Duration,
}

impl RetryState {
    /// State for the first attempt.
    #[must_use]
    pub const fn new(policy: &RetryPolicy) -> Self {
        Self { attempt: 1, backoff: policy.initial_backoff }
    }

    /// Current attempt number, starting at 1.
    #[must_use]
    pub const fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Backoff to wait (before jitter) if the current attempt fails.
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Whether the current attempt is the last one allowed.
    #[must_use]
    pub const fn is_last(&self, policy: &RetryPolicy) -> bool {
        self.attempt >= policy.max_attempts()
    }

    /// State for the next attempt, with backoff grown according to `reason`.
    #[must_use]
    pub fn advance(self, reason: RetryReason, policy: &RetryPolicy) -> Self {
        let factor = match reason {
            RetryReason::RateLimited | RetryReason::ServerError(_) => policy.rate_limit_multiplier,
            RetryReason::Timeout => policy.timeout_multiplier,
        };
        Self { attempt: self.attempt + 1, backoff: self.backoff.mul_f64(factor) }
    }
}

/// `backoff` plus a uniform jitter in `[0, max_jitter)`.
#[must_use]
pub fn with_jitter(backoff: Duration, max_jitter: Duration) -> Duration {
    backoff + max_jitter.mul_f64(rand::random::<f64>())
}
