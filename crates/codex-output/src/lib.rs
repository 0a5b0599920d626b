//! Persistence of normalized code-system tables.
//!
//! Tables are written as UTF-8, comma-delimited CSV with the header of their
//! validation mode (`code,description,last_updated` or
//! `code,description,is_valid`), rows in table order.

mod error;
mod writer;

pub use error::{PersistError, Result};
pub use writer::{
    OUTPUT_EXTENSION, PersistOptions, PersistOutcome, output_path, persist, write_csv,
};
