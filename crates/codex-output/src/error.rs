//! Error types for persisting tables.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing a normalized table.
#[derive(Debug, Error)]
pub enum PersistError {
    /// File system operation failed.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization failed.
    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The temporary file could not replace the destination.
    #[error("failed to move {temp_path} to {target_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// The path the failed operation was working on.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Csv { path, .. } => path,
            Self::AtomicWriteFailed { target_path, .. } => target_path,
        }
    }
}

/// Result type for persistence operations.
pub type Result<T> = std::result::Result<T, PersistError>;
