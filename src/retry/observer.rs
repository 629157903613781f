//! Retry event observers

use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// A retryable attempt that is about to be followed by a wait
pub struct RetryEvent<'a> {
    /// 1-based attempt that just failed
    pub attempt: u32,
    /// Attempt bound for this run
    pub max_attempts: u32,
    /// Status of the failed attempt, if a response was obtained
    pub status: Option<u16>,
    /// Error reported by the failed attempt
    pub error: &'a dyn fmt::Display,
    /// Wait before the next attempt
    pub backoff: Duration,
}

impl fmt::Debug for RetryEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryEvent")
            .field("attempt", &self.attempt)
            .field("max_attempts", &self.max_attempts)
            .field("status", &self.status)
            .field("error", &format_args!("{}", self.error))
            .field("backoff", &self.backoff)
            .finish()
    }
}

/// Receives retry loop events
pub trait RetryObserver: Send + Sync {
    /// A retryable failure; the executor will wait `event.backoff` next
    fn on_retry(&self, event: &RetryEvent<'_>);

    /// Every attempt failed with a retryable status
    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display);

    /// The wait after `attempt` was cancelled
    fn on_cancelled(&self, attempt: u32) {
        let _ = attempt;
    }
}

/// Observer that logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RetryObserver for TracingObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        info!(
            attempt = event.attempt,
            max_attempts = event.max_attempts,
            status = event.status,
            backoff = ?event.backoff,
            "Attempt {} failed: {}, retrying in {:?}",
            event.attempt,
            event.error,
            event.backoff
        );
    }

    fn on_exhausted(&self, attempts: u32, error: &dyn fmt::Display) {
        info!(attempts, "Request failed after {} attempts: {}", attempts, error);
    }

    fn on_cancelled(&self, attempt: u32) {
        warn!(attempt, "Retry wait cancelled after attempt {}", attempt);
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn on_retry(&self, _event: &RetryEvent<'_>) {}

    fn on_exhausted(&self, _attempts: u32, _error: &dyn fmt::Display) {}
}
