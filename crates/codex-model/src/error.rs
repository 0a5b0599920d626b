//! Configuration errors.

use thiserror::Error;

use crate::config::CanonicalField;

/// A vocabulary configuration that cannot be used, either on its own or
/// against the columns a source actually has.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("profile '{profile}' has an empty code pattern")]
    EmptyPattern { profile: String },

    #[error("profile '{profile}' has an invalid code pattern '{pattern}': {message}")]
    InvalidPattern {
        profile: String,
        pattern: String,
        message: String,
    },

    #[error("profile '{profile}' defines no column strategies for {field}")]
    MissingStrategies {
        profile: String,
        field: CanonicalField,
    },

    #[error("profile '{profile}' uses '{column}' for both code and description")]
    DuplicateColumns { profile: String, column: String },

    #[error("profile '{profile}' is invalid: {reason}")]
    InvalidConfig { profile: String, reason: String },

    /// No strategy resolved against the source's columns.
    #[error("profile '{profile}' could not resolve {field} column (tried {})", tried.join(", "))]
    MissingColumn {
        profile: String,
        field: CanonicalField,
        tried: Vec<String>,
    },
}
