//! Delay between failed attempts.

use rand::Rng;
use std::time::Duration;

/// How the pause between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Sleep the base interval every time.
    #[default]
    Fixed,
    /// Double the base interval after each failure, capped at `max`, with jitter.
    Exponential { max: Duration },
}

impl Backoff {
    /// Delay to sleep after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32, interval: Duration) -> Duration {
        match *self {
            Backoff::Fixed => interval,
            Backoff::Exponential { max } => calculate_backoff(attempt, interval, max),
        }
    }
}

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponential_base = 2u32.saturating_pow(attempt - 1);
    let delay = base.saturating_mul(exponential_base);
    let capped_delay = delay.min(max);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = u64::try_from(capped_delay.as_millis()).unwrap_or(u64::MAX) / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    capped_delay.saturating_add(Duration::from_millis(jitter))
}
