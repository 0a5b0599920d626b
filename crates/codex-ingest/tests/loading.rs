//! File-based loading tests.

use std::io::Write;
use std::path::Path;

use codex_ingest::{IngestError, LoadOptions, MalformedPolicy, load_table};
use codex_model::{FieldSeparator, SourceFormat};
use tempfile::NamedTempFile;

fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file
}

#[test]
fn missing_file_is_reported() {
    let options = LoadOptions::new(SourceFormat::delimited(FieldSeparator::Comma), true);
    let err = load_table(Path::new("/nonexistent/loinc.csv"), &options).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
}

#[test]
fn windows_1252_file_loads() {
    let file = temp_file(b"code;description\nM54.5;Lumbago \x96 low back pain\n");
    let options = LoadOptions::new(SourceFormat::delimited(FieldSeparator::Semicolon), true);
    let table = load_table(file.path(), &options).unwrap();
    assert_eq!(table.records[0].get(1), Some("Lumbago \u{2013} low back pain"));
}

#[test]
fn npi_extract_with_ragged_rows() {
    let file = temp_file(
        b"NPI,Provider Organization Name (Legal Business Name),Provider First Name,Provider Last Name (Legal Name)\n\
1234567890,General Clinic,,\n\
1234567891,,Ada,Lovelace\n\
1234567892,Broken\n\
\"1234567893\",\"Smith, Jones & Co\",,\n",
    );
    let options = LoadOptions::new(SourceFormat::delimited(FieldSeparator::Comma), true);

    let err = load_table(file.path(), &options).unwrap_err();
    assert!(matches!(err, IngestError::MalformedLine { line: 4, .. }));

    let table = load_table(file.path(), &options.with_malformed(MalformedPolicy::Skip)).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.malformed_skipped, 1);
    assert_eq!(table.records[2].get(1), Some("Smith, Jones & Co"));
    assert_eq!(
        table.header_index("provider organization name (legal business name)"),
        Some(1)
    );
}

#[test]
fn claml_file_loads() {
    let file = temp_file(
        br#"<?xml version="1.0" encoding="UTF-8"?>
<ClaML>
  <Class code="J45" kind="category">
    <Rubric kind="preferred"><Label>Asthma</Label></Rubric>
  </Class>
</ClaML>
"#,
    );
    let options = LoadOptions::new(SourceFormat::Claml, true);
    let table = load_table(file.path(), &options).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].values, vec!["J45", "Asthma"]);
}

#[test]
fn rrf_rows_keep_trailing_separator_width() {
    let file = temp_file(
        b"198440|ENG|P|L|PF|S|Y|A|||||RXNORM|SCD|Acetaminophen 500 MG Oral Tablet|N||\n\
161|ENG|P|L|PF|S|Y|A|||||RXNORM|IN|Acetaminophen|N||\n",
    );
    let options = LoadOptions::new(
        SourceFormat::Delimited {
            separator: FieldSeparator::Pipe,
            quoting: false,
        },
        false,
    );
    let table = load_table(file.path(), &options).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].get(0), Some("198440"));
    assert_eq!(table.records[1].get(14), Some("Acetaminophen"));
}
