//! Retrying executor for delete-style admin API calls
//!
//! Wraps a single network operation with capped exponential backoff.
//! Only errors whose HTTP status is in a caller-supplied allow-list are
//! retried; everything else is handed straight back to the caller.
//!
//! # Features
//!
//! - **Bounded attempts**: 4 attempts by default (1 initial + 3 retries)
//! - **Exponential backoff**: 1s, 2s, 4s, no jitter
//! - **Pluggable waiting**: async `Sleeper` with optional cancellation
//! - **Observable**: retry and exhaustion events go through a `RetryObserver`

mod executor;
mod observer;
mod sleeper;
mod types;

pub use executor::{exponential_backoff_retry_delete, RetryExecutor};
pub use observer::{NoopObserver, RetryEvent, RetryObserver, TracingObserver};
pub use sleeper::{Sleeper, TokioSleeper};
pub use types::{ResponseStatus, RetryPolicy};
