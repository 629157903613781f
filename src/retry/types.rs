//! Retry policy types

use std::time::Duration;

/// Default number of attempts, initial call included
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default wait before the first retry
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Anything that may carry the HTTP status of the response it came from.
///
/// `None` means no response was obtained at all (connect failure, TLS error,
/// timeout before headers, ...).
pub trait ResponseStatus {
    /// HTTP status code of the response behind this value, if any
    fn status(&self) -> Option<u16>;
}

impl ResponseStatus for reqwest::Error {
    fn status(&self) -> Option<u16> {
        reqwest::Error::status(self).map(|s| s.as_u16())
    }
}

/// Retry policy for a delete executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, initial call included
    pub max_attempts: u32,
    /// Wait before the first retry; doubles after each retry
    pub initial_backoff: Duration,
    /// Also retry when no response was obtained
    pub retry_on_no_response: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            retry_on_no_response: false,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default bounds
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max attempts (clamped to at least one)
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the initial backoff
    #[must_use]
    pub fn initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Treat a missing response as retryable
    #[must_use]
    pub fn retry_on_no_response(mut self, retry: bool) -> Self {
        self.retry_on_no_response = retry;
        self
    }

    /// Decide whether an outcome with the given status is retryable
    pub fn is_retryable(&self, status: Option<u16>, retryable: &[u16]) -> bool {
        match status {
            Some(code) => retryable.contains(&code),
            None => self.retry_on_no_response,
        }
    }

    /// Backoff waited after the given (1-based) attempt
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial_backoff.saturating_mul(1u32 << exp)
    }

    /// Sum of all waits for a run that exhausts every attempt
    pub fn worst_case_wait(&self) -> Duration {
        (1..self.max_attempts.max(1))
            .map(|attempt| self.backoff_for(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }
}
