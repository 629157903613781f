//! Bounded retry loop

use super::observer::{RetryEvent, RetryObserver, TracingObserver};
use super::sleeper::{Sleeper, TokioSleeper};
use super::types::{ResponseStatus, RetryPolicy};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Runs an operation with capped exponential backoff on retryable statuses
///
/// The executor holds no per-call state: every [`RetryExecutor::run`] starts
/// again from the policy's initial backoff.
#[derive(Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    observer: Arc<dyn RetryObserver>,
    cancel: Option<CancellationToken>,
}

impl RetryExecutor {
    /// Create an executor with the tokio sleeper and tracing observer
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            sleeper: Arc::new(TokioSleeper),
            observer: Arc::new(TracingObserver),
            cancel: None,
        }
    }

    /// Replace the sleeper
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Replace the observer
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RetryObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Abort pending waits when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run `op` until it succeeds, fails terminally or runs out of attempts.
    ///
    /// An `Err` is retried only when its status is in `retryable` (or it has
    /// no status and the policy retries missing responses). The result of the
    /// last attempt is always returned untouched.
    pub async fn run<T, E, F, Fut>(&self, retryable: &[u16], mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: ResponseStatus + fmt::Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let error = match op().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let status = error.status();
            if !self.policy.is_retryable(status, retryable) {
                return Err(error);
            }

            if attempt >= max_attempts {
                self.observer.on_exhausted(attempt, &error);
                return Err(error);
            }

            let backoff = self.policy.backoff_for(attempt);
            self.observer.on_retry(&RetryEvent {
                attempt,
                max_attempts,
                status,
                error: &error,
                backoff,
            });

            if !self.wait(backoff).await {
                self.observer.on_cancelled(attempt);
                return Err(error);
            }

            attempt += 1;
        }
    }

    /// Wait out `backoff`; false if cancelled first
    async fn wait(&self, backoff: Duration) -> bool {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => false,
                    () = self.sleeper.sleep(backoff) => true,
                }
            }
            None => {
                self.sleeper.sleep(backoff).await;
                true
            }
        }
    }
}

impl Default for RetryExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default())
    }
}

impl fmt::Debug for RetryExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryExecutor")
            .field("policy", &self.policy)
            .field("cancellable", &self.cancel.is_some())
            .finish_non_exhaustive()
    }
}

/// Run a delete with the default policy, tokio timer and tracing logs
pub async fn exponential_backoff_retry_delete<T, E, F, Fut>(
    retryable: &[u16],
    op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: ResponseStatus + fmt::Display,
{
    RetryExecutor::default().run(retryable, op).await
}
