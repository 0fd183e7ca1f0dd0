//! Named dependency registry.
//!
//! # Responsibilities
//! - Hold one check per dependency name (last add wins)
//! - Allow adds from any thread, including while a wait is running
//! - Run every registered check concurrently and aggregate the result

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::check::Check;
use crate::dependencies::runner::perform_check;
use crate::dependencies::types::{AggregatedError, Outcome, WaitError};
use crate::resilience::{PolicyError, RetryPolicy};

/// A set of named dependencies to wait for.
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct Dependencies {
    checks: Arc<RwLock<HashMap<String, Check>>>,
}

impl Dependencies {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `check` under `name`, replacing any previous check with that name.
    ///
    /// ```
    /// # use std::time::Duration;
    /// # use waitfor::{check, Dependencies};
    /// let deps = Dependencies::new();
    /// deps.add("rest-endpoint", check::service_listening("0.0.0.0:8443", Duration::from_secs(10)));
    /// assert_eq!(deps.len(), 1);
    /// ```
    pub fn add(&self, name: impl Into<String>, check: Check) {
        let name = name.into();
        let mut checks = self.checks.write().unwrap_or_else(PoisonError::into_inner);
        if checks.insert(name.clone(), check).is_some() {
            tracing::debug!(dependency = %name, "Replaced existing dependency check");
        }
    }

    /// Number of registered dependencies.
    pub fn len(&self) -> usize {
        self.checks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// True when no dependency is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered dependency names, sorted.
    pub fn names(&self) -> Vec<String> {
        let checks = self.checks.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = checks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Wait for every dependency using the default policy
    /// (10 attempts, 10 seconds apart).
    pub async fn wait(&self) -> Result<(), WaitError> {
        self.wait_with(RetryPolicy::default()).await
    }

    /// Wait for every dependency using `policy`.
    ///
    /// Returns once each check has either succeeded or used up its attempts.
    /// Checks added after this call starts are not part of it.
    pub async fn wait_with(&self, policy: RetryPolicy) -> Result<(), WaitError> {
        let outcomes = self.check_all(policy).await?;

        let failures: Vec<_> = outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Outcome::Exhausted(e) => Some(e),
                Outcome::Ready { .. } => None,
            })
            .collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(WaitError::NotReady(AggregatedError::new(failures)))
        }
    }

    /// Run every registered check concurrently and return each terminal outcome,
    /// sorted by dependency name.
    ///
    /// An empty registry is ready under any policy; otherwise the policy is
    /// validated before any check runs.
    pub async fn check_all(&self, policy: RetryPolicy) -> Result<Vec<Outcome>, PolicyError> {
        let snapshot: Vec<(String, Check)> = {
            let checks = self.checks.read().unwrap_or_else(PoisonError::into_inner);
            checks
                .iter()
                .map(|(name, check)| (name.clone(), check.clone()))
                .collect()
        };

        if snapshot.is_empty() {
            return Ok(Vec::new());
        }
        policy.validate()?;

        tracing::debug!(
            dependencies = snapshot.len(),
            retries = policy.retries,
            interval_secs = policy.interval.as_secs_f64(),
            "Checking dependencies"
        );

        // Sized so no worker ever blocks on send.
        let (tx, mut rx) = mpsc::channel(snapshot.len());
        let mut workers = JoinSet::new();

        for (name, check) in snapshot {
            let tx = tx.clone();
            workers.spawn(async move {
                tracing::info!(dependency = %name, "Waiting for {}", name);
                let outcome = perform_check(name, check, policy).await;
                let _ = tx.send(outcome).await;
            });
        }
        drop(tx);

        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!(error = %e, "Dependency worker terminated abnormally");
            }
        }

        outcomes.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckError;
    use std::time::Duration;

    fn ok() -> Check {
        Check::from_fn(|| Ok(()))
    }

    fn failing(msg: &'static str) -> Check {
        Check::from_fn(move || Err(CheckError::Other(msg.to_string())))
    }

    #[test]
    fn test_new_is_empty() {
        let deps = Dependencies::new();
        assert!(deps.is_empty());
        assert!(deps.names().is_empty());
    }

    #[test]
    fn test_add_overwrites() {
        let deps = Dependencies::new();
        deps.add("db", failing("old"));
        deps.add("db", ok());
        deps.add("api", ok());
        assert_eq!(deps.len(), 2);
        assert_eq!(deps.names(), vec!["api".to_string(), "db".to_string()]);
    }

    #[test]
    fn test_clones_share_registry() {
        let deps = Dependencies::new();
        let other = deps.clone();
        other.add("cache", ok());
        assert_eq!(deps.names(), vec!["cache".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_wait_succeeds() {
        let deps = Dependencies::new();
        assert!(deps.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_empty_registry_ignores_policy() {
        let deps = Dependencies::new();
        let outcomes = deps
            .check_all(RetryPolicy::new(0, Duration::from_secs(1)))
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_zero_retries_rejected() {
        let deps = Dependencies::new();
        deps.add("a", ok());
        let err = deps
            .wait_with(RetryPolicy::new(0, Duration::from_millis(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::InvalidPolicy(PolicyError::ZeroRetries)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_sorted_by_name() {
        let deps = Dependencies::new();
        deps.add("zeta", ok());
        deps.add("alpha", failing("down"));
        deps.add("mid", ok());

        let outcomes = deps
            .check_all(RetryPolicy::new(2, Duration::from_secs(1)))
            .await
            .unwrap();
        let names: Vec<&str> = outcomes.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert!(!outcomes[0].is_ready());
        assert!(outcomes[1].is_ready() && outcomes[2].is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_check_reported_as_failure() {
        let deps = Dependencies::new();
        deps.add("boom", Check::from_fn(|| panic!("dependency exploded")));
        deps.add("fine", ok());

        let err = deps
            .wait_with(RetryPolicy::new(2, Duration::from_secs(1)))
            .await
            .unwrap_err();
        let agg = err.not_ready().unwrap();
        assert_eq!(agg.failed_names(), vec!["boom"]);
        assert!(err.to_string().contains("check panicked"));
    }
}
