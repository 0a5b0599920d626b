//! Normalization of medical code-system tables.
//!
//! One configurable engine turns any supported vocabulary file into an ordered
//! `(code, description, last_updated)` table. What differs per vocabulary is
//! data ([`CodeSystemConfig`](codex_model::CodeSystemConfig)); the steps are
//! the same for all of them:
//!
//! 1. Load the raw source ([`codex_ingest`])
//! 2. Resolve the code and description columns through ordered strategies
//! 3. Trim, case-fold codes, substitute missing descriptions
//! 4. Validate codes against the anchored pattern (strict drops, audit flags)
//! 5. Stamp every row with one processing time
//! 6. Drop exact duplicates, keeping the first
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use codex_model::{CodeSystem, CodeSystemConfig, FieldSeparator, SourceFormat};
//! use codex_normalization::{NormalizationContext, normalize_reader};
//!
//! let config = CodeSystemConfig::new(
//!     "hcpcs",
//!     CodeSystem::Hcpcs,
//!     SourceFormat::delimited(FieldSeparator::Pipe),
//!     r"[A-Z]\d{4}",
//! )?;
//! let source = "code|description\na0021 | Foo \nXYZ|Bad\n";
//! let table = normalize_reader(
//!     source.as_bytes(),
//!     Path::new("hcpcs.txt"),
//!     &config,
//!     &NormalizationContext::new(),
//! )?;
//! assert_eq!(table.records[0].code, "A0021");
//! assert_eq!(table.records[0].description, "Foo");
//! assert_eq!(table.stats.invalid_dropped, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod clean;
mod context;
mod error;
mod pipeline;
mod report;
mod resolve;

// Error type
pub use error::{NormalizationError, Result};

// Run settings
pub use context::NormalizationContext;

// Pipeline
pub use pipeline::{dedupe_records, normalize, normalize_reader, normalize_table};

// Steps
pub use clean::{clean_code, clean_description, insert_decimal, normalize_code};
pub use resolve::{ColumnSelection, ColumnSource, Resolution, ResolvedColumn, resolve_columns};

// Reporting
pub use report::{NullReporter, PipelineEvent, PipelineReporter, TracingReporter};
