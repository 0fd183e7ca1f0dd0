//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Engine and checks emit tracing events:
//!     → "Waiting for <name>" / "<name> is ready" (info)
//!     → failed attempts (debug), exhausted budgets (warn)
//!     → logging.rs subscriber (stderr, text or JSON)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's job
//! - RUST_LOG overrides the configured level

pub mod logging;
