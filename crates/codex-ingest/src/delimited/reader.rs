//! Delimited source reading with a fixed field count.

use std::path::Path;

use codex_model::{FieldSeparator, RawRecord, RawTable};

use crate::error::{IngestError, Result};
use crate::options::MalformedPolicy;

use super::sniff::sniff_separator;

/// Settings for one delimited read.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DelimitedLayout {
    pub separator: FieldSeparator,
    pub quoting: bool,
    pub has_header: bool,
}

/// Parse delimited text into a [`RawTable`].
///
/// The field count is fixed by the header (or by the first record when there
/// is none); records with a different count are malformed. Lines whose fields
/// are all blank are ignored.
pub(crate) fn read_delimited(
    text: &str,
    path: &Path,
    layout: DelimitedLayout,
    policy: MalformedPolicy,
) -> Result<RawTable> {
    let separator = match layout.separator {
        FieldSeparator::Auto => {
            let detected = sniff_separator(text);
            tracing::debug!(path = %path.display(), separator = detected.as_str(), "detected separator");
            detected
        }
        other => other,
    };
    let delimiter = separator.byte().unwrap_or(b',');

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(layout.quoting)
        .from_reader(text.as_bytes());

    let mut table = RawTable::new(None);
    let mut expected_width: Option<usize> = None;
    let mut header_pending = layout.has_header;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                let line = err.position().map_or(0, |pos| pos.line());
                if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                    return Err(IngestError::CsvParse {
                        path: path.to_path_buf(),
                        line,
                        message: err.to_string(),
                    });
                }
                policy.handle(
                    &mut table,
                    IngestError::CsvParse {
                        path: path.to_path_buf(),
                        line,
                        message: err.to_string(),
                    },
                )?;
                continue;
            }
        };
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = record.position().map_or(0, |pos| pos.line());
        let values: Vec<String> = record.iter().map(str::to_string).collect();

        if header_pending {
            header_pending = false;
            expected_width = Some(values.len());
            table.headers = Some(values);
            continue;
        }

        match expected_width {
            None => expected_width = Some(values.len()),
            Some(width) if width != values.len() => {
                policy.handle(
                    &mut table,
                    IngestError::MalformedLine {
                        path: path.to_path_buf(),
                        line,
                        reason: format!("expected {width} fields, found {}", values.len()),
                    },
                )?;
                continue;
            }
            Some(_) => {}
        }
        table.push(RawRecord::new(line, values));
    }

    if table.headers.is_none() && table.is_empty() && table.malformed_skipped == 0 {
        return Err(IngestError::EmptySource {
            path: path.to_path_buf(),
        });
    }
    Ok(table)
}
