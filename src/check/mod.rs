//! Readiness checks.
//!
//! # Data Flow
//! ```text
//! Constructor (tcp.rs / database.rs / http.rs)
//!     → captures its parameters by value
//!     → Check (cloneable handle to an async probe)
//!     → invoked once per attempt by the retry loop
//! ```
//!
//! # Design Decisions
//! - A check owns no state between invocations
//! - Resources (sockets, connections) are acquired and released inside one call
//! - Failures carry the underlying cause so the final report can name it

pub mod database;
pub mod http;
pub mod tcp;

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use thiserror::Error;

pub use database::database_ready;
pub use http::http_ok;
pub use tcp::service_listening;

/// Error from a single check attempt.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Network or filesystem error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The probe did not answer within its own deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Database connect or ping failed.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Driver name not known to the database check.
    #[error("unsupported database driver '{0}'")]
    UnsupportedDriver(String),

    /// HTTP request failed before a response arrived.
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// HTTP response with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Anything else, described by the check itself.
    #[error("{0}")]
    Other(String),
}

/// Result type for check attempts.
pub type CheckResult = Result<(), CheckError>;

type ProbeFn = dyn Fn() -> BoxFuture<'static, CheckResult> + Send + Sync;

/// A readiness probe for one dependency.
///
/// Cheap to clone; every clone runs the same probe.
#[derive(Clone)]
pub struct Check {
    probe: Arc<ProbeFn>,
}

impl Check {
    /// Build a check from a closure returning a future.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        Self {
            probe: Arc::new(move || f().boxed()),
        }
    }

    /// Build a check from a synchronous closure.
    ///
    /// Each attempt runs on tokio's blocking pool, so a check that blocks
    /// (sleeps, synchronous I/O) does not hold up other checks.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> CheckResult + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::new(move || {
            let f = f.clone();
            async move {
                match tokio::task::spawn_blocking(move || (*f)()).await {
                    Ok(result) => result,
                    Err(e) if e.is_panic() => Err(CheckError::Other("check panicked".to_string())),
                    Err(e) => Err(CheckError::Other(format!("check did not complete: {}", e))),
                }
            }
        })
    }

    /// Run one attempt.
    pub fn run(&self) -> BoxFuture<'static, CheckResult> {
        (self.probe)()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").finish_non_exhaustive()
    }
}
