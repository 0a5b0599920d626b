//! Error types for normalization runs.

use codex_ingest::IngestError;
use codex_model::ConfigError;
use thiserror::Error;

/// Errors that abort a run before any row is produced.
#[derive(Debug, Error)]
pub enum NormalizationError {
    /// The source could not be parsed under the configured format.
    #[error(transparent)]
    Load(#[from] IngestError),

    /// The configuration does not fit the source.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for normalization runs.
pub type Result<T> = std::result::Result<T, NormalizationError>;
