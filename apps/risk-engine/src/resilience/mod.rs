//! Resilience patterns for external service calls.
//!
//! Bounded retries with per-attempt timeouts and exponential backoff.

mod retry;

pub use retry::{
    ExponentialBackoffCalculator, MAX_ATTEMPTS_LIMIT, RetryError, RetryPolicy, retry_with_timeout,
};
