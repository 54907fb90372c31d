//! Retry budget and exponential backoff shared by all section queries.

use std::time::Duration;

use crate::error::Error;

/// How many times a failed fetch is retried, and how long to wait in between.
///
/// The delay before retry `n` (1-based) is `min(base_delay * 2^n, max_delay)`,
/// so the defaults wait 2 s, 4 s and 8 s.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcms::query::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay(1), Duration::from_secs(2));
/// assert_eq!(policy.delay(3), Duration::from_secs(8));
/// assert_eq!(policy.delay(10), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl RetryPolicy {
    pub const fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// A policy that gives up after the first failure.
    pub const fn never() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Backoff before retry number `retry` (1-based), capped at `max_delay`.
    pub fn delay(&self, retry: u32) -> Duration {
        2u32.checked_pow(retry)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Whether to try again after `failures` consecutive failures, the last
    /// of which was `err`.
    pub fn should_retry(&self, failures: u32, err: &Error) -> bool {
        failures <= self.max_retries && err.is_retryable()
    }
}
