//! Client-side request budget.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use tracing::debug;

use crate::config::RateLimitConfig;

type DirectRateLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Allows bursts of `max_requests`, refilled at `max_requests` per `window`.
///
/// Callers over budget wait for the next cell rather than fail, so a burst
/// of section fetches is spread out instead of dropped.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use rcms::config::RateLimitConfig;
/// use rcms::security::RateLimiter;
///
/// let limiter = RateLimiter::new(RateLimitConfig {
///     max_requests: 2,
///     window: Duration::from_secs(60),
/// });
/// assert!(limiter.try_acquire().is_ok());
/// assert!(limiter.try_acquire().is_ok());
/// assert!(limiter.try_acquire().is_err());
/// ```
pub struct RateLimiter {
    quota: Quota,
    limiter: DirectRateLimiter,
    clock: DefaultClock,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let burst = NonZeroU32::new(config.max_requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::with_period(config.window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst);
        Self {
            quota,
            limiter: governor::RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        }
    }

    /// Takes one cell if one is available.
    ///
    /// Returns `Err(wait)` with the time until the next cell when the budget
    /// is spent.
    pub fn try_acquire(&self) -> Result<(), Duration> {
        self.limiter
            .check()
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }

    /// Waits until a cell is available, then takes it.
    pub async fn acquire(&self) {
        if let Err(wait) = self.try_acquire() {
            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting");
            self.limiter.until_ready().await;
        }
    }
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("quota", &self.quota)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    fn limiter(max_requests: u32, window_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_millis(window_ms),
        })
    }

    #[test]
    fn burst_up_to_max_requests() {
        let l = limiter(3, 60_000);
        assert!(l.try_acquire().is_ok());
        assert!(l.try_acquire().is_ok());
        assert!(l.try_acquire().is_ok());
        assert!(l.try_acquire().is_err());
    }

    #[test]
    fn reports_time_until_next_cell() {
        let l = limiter(2, 60_000);
        l.try_acquire().unwrap();
        l.try_acquire().unwrap();
        let wait = l.try_acquire().unwrap_err();
        assert!(wait > Duration::from_secs(25), "{wait:?}");
        assert!(wait <= Duration::from_secs(30), "{wait:?}");
    }

    #[test]
    fn zero_budget_still_lets_one_through() {
        let l = limiter(0, 60_000);
        assert!(l.try_acquire().is_ok());
        assert!(l.try_acquire().is_err());
    }

    #[tokio::test]
    async fn acquire_waits_for_the_next_cell() {
        let l = limiter(1, 150);
        let started = Instant::now();
        l.acquire().await;
        l.acquire().await;
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn acquire_within_budget_does_not_wait() {
        let l = limiter(5, 60_000);
        let started = Instant::now();
        for _ in 0..5 {
            l.acquire().await;
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
