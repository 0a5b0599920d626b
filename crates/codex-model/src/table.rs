//! Pipeline results.

use serde::Serialize;

use crate::config::ValidationMode;
use crate::record::{NormalizedRecord, ProcessedAt};
use crate::system::CodeSystem;

/// Row accounting for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    /// Records parsed from the source.
    pub rows_read: usize,
    /// Lines the loader skipped as malformed.
    pub malformed_skipped: usize,
    /// Rows removed by strict validation.
    pub invalid_dropped: usize,
    /// Rows kept with `is_valid = false` in audit mode.
    pub invalid_flagged: usize,
    /// Exact duplicates removed.
    pub duplicates_removed: usize,
    /// Rows in the final table.
    pub rows_retained: usize,
}

impl NormalizationStats {
    /// Fraction of read rows that did not reach the output.
    pub fn drop_rate(&self) -> f64 {
        if self.rows_read == 0 {
            0.0
        } else {
            (self.rows_read - self.rows_retained) as f64 / self.rows_read as f64
        }
    }
}

/// The ordered output of a normalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTable {
    pub profile: String,
    pub system: CodeSystem,
    pub mode: ValidationMode,
    pub processed_at: ProcessedAt,
    pub records: Vec<NormalizedRecord>,
    pub stats: NormalizationStats,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> [&'static str; 3] {
        self.mode.output_columns()
    }

    /// Output cells for one record, in [`Self::columns`] order.
    pub fn row_values(&self, record: &NormalizedRecord) -> [String; 3] {
        let last = match self.mode {
            ValidationMode::Strict => record.last_updated.to_string(),
            ValidationMode::Audit => record.is_valid.to_string(),
        };
        [record.code.clone(), record.description.clone(), last]
    }
}
