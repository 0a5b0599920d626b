//! Data model for medical code-system normalization.
//!
//! This crate holds the plain data types shared by every stage of the
//! normalization pipeline:
//! - **Code systems**: [`CodeSystem`] identifies the vocabulary (HCPCS, ICD-10, LOINC, ...)
//! - **Configuration**: [`CodeSystemConfig`] describes how a raw source file is read,
//!   which columns become `code`/`description`, and which pattern a code must match
//! - **Records**: [`RawTable`]/[`RawRecord`] as loaded, [`NormalizedRecord`] as produced
//! - **Results**: [`NormalizedTable`] and its [`NormalizationStats`]
//!
//! # Example
//!
//! ```
//! use codex_model::{CodeSystem, CodeSystemConfig, FieldSeparator, SourceFormat};
//!
//! let config = CodeSystemConfig::new(
//!     "hcpcs",
//!     CodeSystem::Hcpcs,
//!     SourceFormat::delimited(FieldSeparator::Pipe),
//!     r"[A-Z]\d{4}",
//! )
//! .unwrap();
//!
//! assert!(config.code_pattern.is_match("A0021"));
//! assert!(!config.code_pattern.is_match("A0021X"));
//! ```

mod config;
mod error;
mod record;
mod system;
mod table;

// === Configuration ===
pub use config::{
    CanonicalField, CodePattern, CodeSystemConfig, ColumnStrategy, DEFAULT_FALLBACK_DESCRIPTION,
    FieldSeparator, FixedField, SourceFormat, ValidationMode,
};

// === Errors ===
pub use error::ConfigError;

// === Records ===
pub use record::{NormalizedRecord, ProcessedAt, RawRecord, RawTable, normalize_header_name};

// === Code Systems ===
pub use system::CodeSystem;

// === Results ===
pub use table::{NormalizationStats, NormalizedTable};
