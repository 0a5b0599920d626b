//! Source loading entry points.

use std::fs;
use std::io::Read;
use std::path::Path;

use codex_model::{FieldSeparator, RawTable, SourceFormat};

use crate::claml::read_claml;
use crate::delimited::{DelimitedLayout, read_delimited};
use crate::error::{IngestError, Result};
use crate::fixed_width::read_fixed_width;
use crate::options::LoadOptions;
use crate::text::decode_source;

/// Load a source file.
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RawTable> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    load_bytes(&bytes, path, options)
}

/// Load from any byte source; `origin` names it in errors and logs.
pub fn load_reader<R: Read>(mut reader: R, origin: &Path, options: &LoadOptions) -> Result<RawTable> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|source| IngestError::FileRead {
            path: origin.to_path_buf(),
            source,
        })?;
    load_bytes(&bytes, origin, options)
}

/// Load already-decoded text.
pub fn load_str(text: &str, origin: &Path, options: &LoadOptions) -> Result<RawTable> {
    let table = match &options.format {
        SourceFormat::Delimited { separator, quoting } => read_delimited(
            text,
            origin,
            DelimitedLayout {
                separator: *separator,
                quoting: *quoting,
                has_header: options.has_header,
            },
            options.malformed,
        )?,
        SourceFormat::FixedWidth { fields } => {
            read_fixed_width(text, origin, fields, options.has_header, options.malformed)?
        }
        SourceFormat::Claml => load_claml(text, origin, options)?,
    };

    if table.malformed_skipped > 0 {
        tracing::warn!(
            path = %origin.display(),
            skipped = table.malformed_skipped,
            "skipped malformed lines"
        );
    }
    tracing::info!(
        path = %origin.display(),
        format = %options.format.describe(),
        rows = table.len(),
        "loaded source"
    );
    Ok(table)
}

fn load_bytes(bytes: &[u8], origin: &Path, options: &LoadOptions) -> Result<RawTable> {
    let text = decode_source(bytes, origin);
    load_str(&text, origin, options)
}

/// ClaML first; pipe-delimited with a header when the document is not XML or
/// yields no classes.
fn load_claml(text: &str, origin: &Path, options: &LoadOptions) -> Result<RawTable> {
    match read_claml(text, origin) {
        Ok(table) if !table.is_empty() => return Ok(table),
        Ok(_) => tracing::warn!(
            path = %origin.display(),
            "no ClaML classes found, reading as pipe-delimited"
        ),
        Err(error) => tracing::warn!(
            path = %origin.display(),
            %error,
            "ClaML parse failed, reading as pipe-delimited"
        ),
    }
    read_delimited(
        text,
        origin,
        DelimitedLayout {
            separator: FieldSeparator::Pipe,
            quoting: true,
            has_header: true,
        },
        options.malformed,
    )
}
