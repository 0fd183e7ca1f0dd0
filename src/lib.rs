//! Dependency readiness gate.
//!
//! Register named checks, then block until every dependency answers or its
//! retry budget runs out.
//!
//! ```no_run
//! use std::time::Duration;
//! use waitfor::{check, Dependencies};
//!
//! # async fn run() -> Result<(), waitfor::WaitError> {
//! let deps = Dependencies::new();
//! deps.add("rest-api", check::service_listening("127.0.0.1:8443", Duration::from_secs(10)));
//! deps.wait().await?;
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
pub mod dependencies;
pub mod observability;
pub mod resilience;

pub use check::{Check, CheckError};
pub use config::WaitConfig;
pub use dependencies::{AggregatedError, Dependencies, RetryExhausted, WaitError};
pub use resilience::{Backoff, RetryPolicy};
