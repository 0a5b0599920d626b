//! Error types for source loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a raw code-system source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read the source.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The delimited reader rejected the input.
    #[error("failed to parse {path} at line {line}: {message}")]
    CsvParse {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// A line does not fit the configured layout.
    #[error("malformed line {line} in {path}: {reason}")]
    MalformedLine {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// Source contains no header and no records.
    #[error("source is empty: {path}")]
    EmptySource { path: PathBuf },

    /// ClaML document could not be parsed.
    #[error("invalid XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },
}

impl IngestError {
    /// Source line the error refers to, when known.
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::CsvParse { line, .. } | Self::MalformedLine { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, IngestError>;
