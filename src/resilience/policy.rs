//! Retry policy applied to each check.

use std::time::Duration;
use thiserror::Error;

use crate::resilience::Backoff;

/// Attempts every check gets by default.
pub const DEFAULT_RETRIES: u32 = 10;

/// Pause between attempts by default.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Rejected policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A check must be attempted at least once.
    #[error("retries must be at least 1")]
    ZeroRetries,

    /// Exponential backoff capped below its own base interval.
    #[error("max interval {max:?} is shorter than interval {interval:?}")]
    MaxBelowInterval { interval: Duration, max: Duration },
}

/// How many times a check is attempted and how long to pause between failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub retries: u32,
    /// Base pause after a failed attempt.
    pub interval: Duration,
    /// Growth of the pause across attempts.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Fixed-interval policy.
    pub fn new(retries: u32, interval: Duration) -> Self {
        Self {
            retries,
            interval,
            backoff: Backoff::Fixed,
        }
    }

    /// Switch to exponential backoff capped at `max`.
    pub fn with_exponential_backoff(mut self, max: Duration) -> Self {
        self.backoff = Backoff::Exponential { max };
        self
    }

    /// Check the policy can be run.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.retries == 0 {
            return Err(PolicyError::ZeroRetries);
        }
        if let Backoff::Exponential { max } = self.backoff {
            if max < self.interval {
                return Err(PolicyError::MaxBelowInterval {
                    interval: self.interval,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Pause after failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt, self.interval)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_INTERVAL)
    }
}
