//! Dependency registry and wait engine.
//!
//! # Data Flow
//! ```text
//! add(name, check)        (write lock)
//!     → HashMap<String, Check>
//!
//! wait_with(policy):
//!     snapshot map        (read lock, released before any check runs)
//!     → one task per check (runner.rs: attempt, sleep, attempt, ...)
//!     → terminal outcome per check over a bounded channel
//!     → join all tasks
//!     → AggregatedError if anything is still not ready
//! ```
//!
//! # Design Decisions
//! - All checks start together; total time is bounded by the slowest check
//! - No short-circuit: every check reaches a terminal state before wait returns
//! - Failure lines are sorted by dependency name

pub mod registry;
pub mod runner;
pub mod types;

pub use registry::Dependencies;
pub use types::{AggregatedError, Outcome, RetryExhausted, WaitError};
