//! Bounded retries with per-attempt timeouts and exponential backoff.
//!
//! Used around the two slow collaborators of an evaluation: the account
//! snapshot fetch and the audit write. Rule evaluation itself never retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use risk_engine::resilience::{RetryPolicy, retry_with_timeout};
//!
//! let policy = RetryPolicy::default();
//! let snapshot = retry_with_timeout(&policy, "snapshot", || port.fetch_snapshot(), |e| e.is_retryable()).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::observability::record_retry_attempt;

/// Upper bound on attempts accepted by [`RetryPolicy::validate`].
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Retry policy for one external call.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first (1..=10).
    pub max_attempts: u32,
    /// Timeout applied to each attempt.
    pub attempt_timeout: Duration,
    /// Backoff before the first retry.
    pub initial_backoff: Duration,
    /// Backoff ceiling.
    pub max_backoff: Duration,
    /// Exponential growth factor.
    pub backoff_multiplier: f64,
    /// Jitter factor (0.2 = ±20%).
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(2),
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries.
    #[must_use]
    pub fn no_retry(attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: 1,
            attempt_timeout,
            ..Self::default()
        }
    }

    /// Check bounds.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(format!(
                "max_attempts must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {}",
                self.max_attempts
            ));
        }
        if self.attempt_timeout.is_zero() {
            return Err("attempt_timeout must be positive".to_string());
        }
        if self.initial_backoff > self.max_backoff {
            return Err("initial_backoff must not exceed max_backoff".to_string());
        }
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(format!(
                "jitter_factor must be between 0.0 and 1.0, got {}",
                self.jitter_factor
            ));
        }
        Ok(())
    }
}

/// Calculator for exponential backoff with jitter.
#[derive(Debug)]
pub struct ExponentialBackoffCalculator {
    current_retry: u32,
    max_retries: u32,
    initial_backoff_ms: u64,
    max_backoff_ms: u64,
    backoff_multiplier: f64,
    jitter_factor: f64,
}

impl ExponentialBackoffCalculator {
    /// Create a calculator allowing `max_attempts - 1` retries.
    #[must_use]
    pub const fn new(policy: &RetryPolicy) -> Self {
        Self {
            current_retry: 0,
            max_retries: policy.max_attempts.saturating_sub(1),
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            max_backoff_ms: policy.max_backoff.as_millis() as u64,
            backoff_multiplier: policy.backoff_multiplier,
            jitter_factor: policy.jitter_factor,
        }
    }

    /// Next backoff, or `None` once retries are exhausted.
    pub fn next_backoff(&mut self) -> Option<Duration> {
        if self.current_retry >= self.max_retries {
            return None;
        }

        let base_ms = self.base_backoff_ms();
        let capped_ms = self.apply_jitter(base_ms).min(self.max_backoff_ms);

        self.current_retry += 1;

        Some(Duration::from_millis(capped_ms))
    }

    fn base_backoff_ms(&self) -> u64 {
        let multiplier = self.backoff_multiplier.powi(self.current_retry as i32);
        let backoff = (self.initial_backoff_ms as f64 * multiplier) as u64;
        backoff.min(self.max_backoff_ms)
    }

    /// Uniform jitter in `[backoff * (1 - j), backoff * (1 + j)]`.
    fn apply_jitter(&self, backoff_ms: u64) -> u64 {
        if self.jitter_factor <= 0.0 || backoff_ms == 0 {
            return backoff_ms;
        }
        let mut rng = rand::rng();
        let jitter_range = backoff_ms as f64 * self.jitter_factor;
        let min = (backoff_ms as f64 - jitter_range).max(0.0);
        let max = backoff_ms as f64 + jitter_range;
        rng.random_range(min..=max) as u64
    }

    /// Retries handed out so far.
    #[must_use]
    pub const fn current_retry(&self) -> u32 {
        self.current_retry
    }
}

/// Failure after the retry budget is spent (or on a non-retryable error).
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The last attempt exceeded its timeout.
    #[error("timed out after {attempts} attempt(s)")]
    TimedOut {
        /// Attempts made.
        attempts: u32,
    },
    /// The last attempt failed.
    #[error("failed after {attempts} attempt(s): {last_error}")]
    Failed {
        /// Attempts made.
        attempts: u32,
        /// Error from the last attempt.
        last_error: E,
    },
}

impl<E> RetryError<E> {
    /// Attempts made before giving up.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::TimedOut { attempts } | Self::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Run `op` until it succeeds, a non-retryable error occurs, or the policy is exhausted.
///
/// Each attempt is bounded by `policy.attempt_timeout`; timeouts are always retryable.
pub async fn retry_with_timeout<T, E, F, Fut, R>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut op: F,
    is_retryable: R,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Display,
{
    let mut backoff = ExponentialBackoffCalculator::new(policy);
    let mut attempts = 0;

    loop {
        attempts += 1;
        let failure = match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(last_error)) => {
                if !is_retryable(&last_error) {
                    return Err(RetryError::Failed {
                        attempts,
                        last_error,
                    });
                }
                RetryError::Failed {
                    attempts,
                    last_error,
                }
            }
            Err(_) => RetryError::TimedOut { attempts },
        };

        let Some(delay) = backoff.next_backoff() else {
            return Err(failure);
        };

        tracing::warn!(
            operation,
            attempt = attempts,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %failure,
            "Retrying after failure"
        );
        record_retry_attempt(operation);
        tokio::time::sleep(delay).await;
    }
}
