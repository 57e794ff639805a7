//! Bounded exponential backoff for read-after-write polling.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend may lag between accepting a profile insert and serving it on a
//! read. Sign-up polls with this schedule instead of sleeping a fixed amount.

#[cfg(test)]
#[path = "backoff_test.rs"]
mod backoff_test;

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 6;
pub const DEFAULT_BASE_DELAY_MS: u64 = 250;
pub const DEFAULT_MAX_DELAY_MS: u64 = 4_000;
pub const DEFAULT_MULTIPLIER: u32 = 2;

/// How many times to poll and how long to wait between polls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total reads, including the first one. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before attempt `attempt` (1-based). The first attempt
    /// runs immediately.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = self.multiplier.max(1).saturating_pow(attempt - 2);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Attempt budget, clamped so a zero config still reads once.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Sum of all waits across a full run of attempts.
    #[must_use]
    pub fn total_wait(&self) -> Duration {
        (1..=self.attempts()).map(|n| self.delay_before(n)).sum()
    }
}

/// Suspend for `duration`. Resolves immediately outside the browser.
pub async fn sleep(duration: Duration) {
    #[cfg(feature = "hydrate")]
    {
        gloo_timers::future::sleep(duration).await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = duration;
    }
}
