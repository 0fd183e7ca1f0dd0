//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Dependency check attempt fails:
//!     → policy.rs (attempts left?)
//!     → backoff.rs (how long to sleep before the next attempt)
//! ```
//!
//! # Design Decisions
//! - One policy applies uniformly to every check in a wait
//! - Fixed interval by default; exponential growth is opt-in
//! - Policies are validated before any check runs

pub mod backoff;
pub mod policy;

pub use backoff::Backoff;
pub use policy::{PolicyError, RetryPolicy};
