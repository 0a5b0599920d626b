//! Error types for profile loading.

use std::path::PathBuf;

use codex_model::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a [`CodeSystemRegistry`](crate::CodeSystemRegistry).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StandardsError {
    /// Profile file could not be read.
    #[error("failed to read profile file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Profile document is not valid TOML or does not match the schema.
    #[error("failed to parse profiles from {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A profile violates a configuration invariant.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// No profile with the requested name.
    #[error("unknown profile '{name}' (available: {})", available.join(", "))]
    UnknownProfile {
        name: String,
        available: Vec<String>,
    },
}

/// Result type for profile loading.
pub type Result<T> = std::result::Result<T, StandardsError>;
