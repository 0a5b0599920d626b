//! Raw source loading for code-system release files.
//!
//! Every supported layout is parsed into a [`RawTable`](codex_model::RawTable):
//! an optional header row plus records carrying their source line.
//!
//! # Formats
//!
//! - **Delimited**: comma, tab, pipe or semicolon, or sniffed from the first line
//! - **Fixed-width**: named character ranges (ICD-10-CM order file)
//! - **ClaML**: WHO XML, falling back to pipe-delimited text
//!
//! Bytes that are not valid UTF-8 are decoded as Windows-1252. Malformed lines
//! either abort the load or are skipped and counted, per [`MalformedPolicy`].
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use codex_ingest::{LoadOptions, load_str};
//! use codex_model::{FieldSeparator, SourceFormat};
//!
//! let options = LoadOptions::new(SourceFormat::delimited(FieldSeparator::Pipe), true);
//! let table = load_str("code|description\nA0021|Ambulance\n", Path::new("hcpcs.txt"), &options)?;
//! assert_eq!(table.len(), 1);
//! # Ok::<(), codex_ingest::IngestError>(())
//! ```

mod claml;
mod delimited;
mod error;
mod fixed_width;
mod loader;
mod options;
mod text;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use loader::{load_reader, load_str, load_table};
pub use options::{LoadOptions, MalformedPolicy};

// === Format Helpers ===
pub use claml::{CLAML_COLUMNS, read_claml};
pub use delimited::sniff_separator;
