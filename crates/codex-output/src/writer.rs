//! CSV writing.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use codex_model::NormalizedTable;

use crate::error::{PersistError, Result};

/// Extension appended to the destination base path.
pub const OUTPUT_EXTENSION: &str = "csv";

/// Options for [`persist`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistOptions {
    /// Write at most this many rows.
    pub limit: Option<usize>,
}

impl PersistOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// What [`persist`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub path: PathBuf,
    pub rows_written: usize,
    /// Rows left out because of [`PersistOptions::limit`].
    pub rows_omitted: usize,
}

/// The file written for `base`: `base` with `.csv` appended.
///
/// The extension is appended rather than substituted, so `out/icd10cm.2024`
/// becomes `out/icd10cm.2024.csv`.
pub fn output_path(base: &Path) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

/// Serialize `table` as CSV into `writer`; returns the number of data rows.
pub fn write_csv<W: Write>(
    table: &NormalizedTable,
    writer: W,
    limit: Option<usize>,
) -> std::result::Result<usize, csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(table.columns())?;
    let mut written = 0usize;
    for record in table.records.iter().take(limit.unwrap_or(usize::MAX)) {
        csv_writer.write_record(table.row_values(record))?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}

/// Write `table` to `base` + `.csv`.
///
/// Parent directories are created. The CSV goes to a sibling temporary file
/// that is renamed over the destination, so an existing output is only
/// replaced by a complete one.
pub fn persist(
    table: &NormalizedTable,
    base: &Path,
    options: &PersistOptions,
) -> Result<PersistOutcome> {
    let path = output_path(base);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| PersistError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = temp_path_for(&path);
    let result = write_temp(table, &temp_path, options.limit);
    let rows_written = match result {
        Ok(rows) => rows,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };

    if let Err(source) = fs::rename(&temp_path, &path) {
        let _ = fs::remove_file(&temp_path);
        return Err(PersistError::AtomicWriteFailed {
            temp_path,
            target_path: path,
            source,
        });
    }

    let rows_omitted = table.len() - rows_written;
    if rows_omitted > 0 {
        tracing::info!(
            path = %path.display(),
            rows = rows_written,
            omitted = rows_omitted,
            "row limit applied"
        );
    }
    tracing::info!(
        profile = %table.profile,
        path = %path.display(),
        rows = rows_written,
        "saved"
    );
    Ok(PersistOutcome {
        path,
        rows_written,
        rows_omitted,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_temp(table: &NormalizedTable, temp_path: &Path, limit: Option<usize>) -> Result<usize> {
    let file = File::create(temp_path).map_err(|source| PersistError::Io {
        operation: "create",
        path: temp_path.to_path_buf(),
        source,
    })?;
    let mut buffered = BufWriter::new(file);
    let rows = write_csv(table, &mut buffered, limit).map_err(|source| PersistError::Csv {
        path: temp_path.to_path_buf(),
        source,
    })?;
    let file = buffered.into_inner().map_err(|err| PersistError::Io {
        operation: "write",
        path: temp_path.to_path_buf(),
        source: err.into_error(),
    })?;
    file.sync_all().map_err(|source| PersistError::Io {
        operation: "sync",
        path: temp_path.to_path_buf(),
        source,
    })?;
    Ok(rows)
}
