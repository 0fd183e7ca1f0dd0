//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → WaitConfig (validated)
//!     → build() → Dependencies + RetryPolicy
//! ```
//!
//! # Design Decisions
//! - All policy fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Every validation problem is reported, not just the first

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{BackoffKind, DependencyConfig, DependencyKind, PolicyConfig, WaitConfig};
pub use validation::{validate_config, ValidationError};
