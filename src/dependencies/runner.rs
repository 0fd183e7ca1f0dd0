//! Per-check retry loop.

use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::check::{Check, CheckError, CheckResult};
use crate::dependencies::types::{Outcome, RetryExhausted};
use crate::resilience::RetryPolicy;

/// Attempt `check` until it succeeds or `policy.retries` attempts have failed.
///
/// No sleep follows the successful or the final attempt. The policy must
/// already be validated.
pub async fn perform_check(name: String, check: Check, policy: RetryPolicy) -> Outcome {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match attempt_once(&check).await {
            Ok(()) => {
                tracing::info!(dependency = %name, attempts = attempt, "{} is ready", name);
                return Outcome::Ready { name, attempts: attempt };
            }
            Err(e) if attempt >= policy.retries => {
                tracing::warn!(
                    dependency = %name,
                    attempts = attempt,
                    error = %e,
                    "Gave up waiting for {}",
                    name
                );
                return Outcome::Exhausted(RetryExhausted {
                    name,
                    attempts: attempt,
                    source: e,
                });
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::debug!(
                    dependency = %name,
                    attempt,
                    retries = policy.retries,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "Dependency not ready, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// One attempt; a panicking probe counts as a failed attempt.
async fn attempt_once(check: &Check) -> CheckResult {
    match AssertUnwindSafe(async { check.run().await }).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(CheckError::Other("check panicked".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting(calls: Arc<AtomicU32>, succeed_on: u32) -> Check {
        Check::from_fn(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= succeed_on {
                Ok(())
            } else {
                Err(CheckError::Other(format!("attempt {}", n)))
            }
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let outcome = perform_check(
            "a".into(),
            counting(calls.clone(), 1),
            RetryPolicy::new(5, Duration::from_secs(10)),
        )
        .await;

        assert!(outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let outcome = perform_check(
            "a".into(),
            counting(calls.clone(), 3),
            RetryPolicy::new(5, Duration::from_secs(1)),
        )
        .await;

        assert!(outcome.is_ready());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_keeps_last_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let outcome = perform_check(
            "a".into(),
            counting(calls.clone(), u32::MAX),
            RetryPolicy::new(4, Duration::from_secs(2)),
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // Three sleeps between four attempts, none after the last.
        assert_eq!(started.elapsed(), Duration::from_secs(6));
        match outcome {
            Outcome::Exhausted(e) => {
                assert_eq!(e.attempts, 4);
                assert_eq!(e.to_string(), "Timeout waiting for a because [attempt 4]");
            }
            Outcome::Ready { .. } => panic!("expected exhaustion"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_no_sleep() {
        let calls = Arc::new(AtomicU32::new(0));
        let started = tokio::time::Instant::now();
        let outcome = perform_check(
            "a".into(),
            counting(calls.clone(), u32::MAX),
            RetryPolicy::new(1, Duration::from_secs(30)),
        )
        .await;

        assert!(!outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
