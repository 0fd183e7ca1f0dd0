//! Outcomes and error definitions for a wait.

use std::fmt;
use thiserror::Error;

use crate::check::CheckError;
use crate::resilience::PolicyError;

/// A dependency that never became ready within its retry budget.
#[derive(Debug, Error)]
#[error("Timeout waiting for {name} because [{source}]")]
pub struct RetryExhausted {
    /// Dependency name.
    pub name: String,
    /// Attempts made before giving up.
    pub attempts: u32,
    /// Error from the final attempt.
    pub source: CheckError,
}

/// Terminal state of one dependency's retry loop.
#[derive(Debug)]
pub enum Outcome {
    /// A check attempt succeeded.
    Ready { name: String, attempts: u32 },
    /// Every attempt failed.
    Exhausted(RetryExhausted),
}

impl Outcome {
    /// Dependency name.
    pub fn name(&self) -> &str {
        match self {
            Outcome::Ready { name, .. } => name,
            Outcome::Exhausted(e) => &e.name,
        }
    }

    /// Attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            Outcome::Ready { attempts, .. } => *attempts,
            Outcome::Exhausted(e) => e.attempts,
        }
    }

    /// True when the dependency became ready.
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready { .. })
    }
}

/// Every dependency that was still failing when its budget ran out.
#[derive(Debug)]
pub struct AggregatedError {
    failures: Vec<RetryExhausted>,
}

impl AggregatedError {
    /// Build from individual failures; ordered by dependency name.
    pub fn new(mut failures: Vec<RetryExhausted>) -> Self {
        failures.sort_by(|a, b| a.name.cmp(&b.name));
        Self { failures }
    }

    /// Individual failures, ordered by dependency name.
    pub fn failures(&self) -> &[RetryExhausted] {
        &self.failures
    }

    /// Names of the dependencies that are not ready.
    pub fn failed_names(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.name.as_str()).collect()
    }
}

impl fmt::Display for AggregatedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregatedError {}

/// Errors returned by a wait.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The retry policy cannot be run; no check was attempted.
    #[error("invalid retry policy: {0}")]
    InvalidPolicy(#[from] PolicyError),

    /// One or more dependencies did not become ready.
    #[error("{0}")]
    NotReady(AggregatedError),
}

impl WaitError {
    /// Failures behind a `NotReady`, if any.
    pub fn not_ready(&self) -> Option<&AggregatedError> {
        match self {
            WaitError::NotReady(agg) => Some(agg),
            WaitError::InvalidPolicy(_) => None,
        }
    }
}
