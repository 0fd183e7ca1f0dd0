//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Each dependency carries the fields its kind needs
//! - Names are unique and non-empty; a repeated name in a file is treated as a
//!   mistake even though `Dependencies::add` itself is last-write-wins
//! - Policy values are runnable

use std::collections::HashSet;
use thiserror::Error;

use crate::check::database::Driver;
use crate::config::schema::{DependencyKind, WaitConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("policy: {0}")]
    Policy(String),

    #[error("dependency #{index}: name must not be empty")]
    EmptyName { index: usize },

    #[error("dependency '{0}' is defined more than once")]
    DuplicateName(String),

    #[error("dependency '{name}': missing field '{field}'")]
    MissingField { name: String, field: &'static str },

    #[error("dependency '{name}': unsupported database driver '{driver}'")]
    UnknownDriver { name: String, driver: String },

    #[error("dependency '{name}': timeout_secs must be positive")]
    InvalidTimeout { name: String },
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &WaitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let policy = &config.policy;
    if !policy.interval_secs.is_finite() || policy.interval_secs < 0.0 {
        errors.push(ValidationError::Policy("interval_secs must be zero or positive".into()));
    }
    if let Err(e) = policy.to_policy().validate() {
        errors.push(ValidationError::Policy(e.to_string()));
    }

    let mut seen = HashSet::new();
    for (index, dep) in config.dependencies.iter().enumerate() {
        if dep.name.trim().is_empty() {
            errors.push(ValidationError::EmptyName { index });
            continue;
        }
        if !seen.insert(dep.name.as_str()) {
            errors.push(ValidationError::DuplicateName(dep.name.clone()));
        }

        let missing = |field: &'static str| ValidationError::MissingField {
            name: dep.name.clone(),
            field,
        };
        let blank = |value: &Option<String>| value.as_deref().map_or(true, |v| v.trim().is_empty());

        match dep.kind {
            DependencyKind::Tcp => {
                if blank(&dep.address) {
                    errors.push(missing("address"));
                }
            }
            DependencyKind::Http => {
                if blank(&dep.url) {
                    errors.push(missing("url"));
                }
            }
            DependencyKind::Database => {
                match dep.driver.as_deref() {
                    None | Some("") => errors.push(missing("driver")),
                    Some(driver) if Driver::parse(driver).is_none() => {
                        errors.push(ValidationError::UnknownDriver {
                            name: dep.name.clone(),
                            driver: driver.to_string(),
                        })
                    }
                    Some(_) => {}
                }
                if blank(&dep.datasource) {
                    errors.push(missing("datasource"));
                }
            }
        }

        if matches!(dep.kind, DependencyKind::Tcp | DependencyKind::Http)
            && !(dep.timeout_secs.is_finite() && dep.timeout_secs > 0.0)
        {
            errors.push(ValidationError::InvalidTimeout { name: dep.name.clone() });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
