//! End-to-end behavior per vocabulary, using the built-in profile shapes.

use std::cell::RefCell;
use std::io::Write;
use std::path::Path;

use chrono::{TimeZone, Utc};
use codex_ingest::MalformedPolicy;
use codex_model::{
    CanonicalField, CodeSystem, CodeSystemConfig, ColumnStrategy, ConfigError, FieldSeparator,
    ProcessedAt, SourceFormat, ValidationMode,
};
use codex_normalization::{
    NormalizationContext, NormalizationError, PipelineEvent, normalize, normalize_reader,
};
use tempfile::NamedTempFile;

fn stamp() -> ProcessedAt {
    ProcessedAt::from_datetime(Utc.with_ymd_and_hms(2025, 6, 30, 12, 0, 0).unwrap())
}

fn run(source: &str, config: &CodeSystemConfig, mode: ValidationMode) -> codex_model::NormalizedTable {
    let context = NormalizationContext::new()
        .with_mode(mode)
        .with_processed_at(stamp());
    normalize_reader(source.as_bytes(), Path::new("fixture"), config, &context).unwrap()
}

fn hcpcs() -> CodeSystemConfig {
    CodeSystemConfig::new(
        "hcpcs",
        CodeSystem::Hcpcs,
        SourceFormat::delimited(FieldSeparator::Pipe),
        r"[A-Z]\d{4}",
    )
    .unwrap()
}

fn icd10cm() -> CodeSystemConfig {
    CodeSystemConfig::new(
        "icd10cm",
        CodeSystem::Icd10Cm,
        SourceFormat::delimited(FieldSeparator::Pipe),
        r"[A-TV-Z]\d{2}(\.[0-9A-TV-Z]{1,4})?",
    )
    .unwrap()
}

fn npi() -> CodeSystemConfig {
    CodeSystemConfig::new(
        "npi",
        CodeSystem::Npi,
        SourceFormat::delimited(FieldSeparator::Comma),
        r"\d{10}",
    )
    .unwrap()
    .with_code_column(vec![ColumnStrategy::named("code"), ColumnStrategy::named("NPI")])
    .with_description_column(vec![
        ColumnStrategy::named("description"),
        ColumnStrategy::named("Provider Organization Name (Legal Business Name)"),
        ColumnStrategy::joined(["Provider First Name", "Provider Last Name (Legal Name)"], " "),
    ])
}

fn loinc() -> CodeSystemConfig {
    CodeSystemConfig::new(
        "loinc",
        CodeSystem::Loinc,
        SourceFormat::delimited(FieldSeparator::Comma),
        r"\d{1,7}-\d{1,2}",
    )
    .unwrap()
}

#[test]
fn hcpcs_code_is_trimmed_and_uppercased() {
    let table = run("code|description\na0021 | Foo \n", &hcpcs(), ValidationMode::Strict);
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].code, "A0021");
    assert_eq!(table.records[0].description, "Foo");
    assert!(table.records[0].is_valid);
    assert_eq!(table.records[0].last_updated.to_string(), "2025-06-30 12:00:00");
}

#[test]
fn icd10cm_accepts_lowercase_and_rejects_u_codes() {
    let table = run(
        "code|description\nz99.8|Dependence on other enabling machines\nU07.1|COVID-19\n",
        &icd10cm(),
        ValidationMode::Strict,
    );
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].code, "Z99.8");
    assert_eq!(table.stats.invalid_dropped, 1);
}

#[test]
fn npi_short_code_dropped_in_strict_flagged_in_audit() {
    let source = "NPI,Provider Organization Name (Legal Business Name)\n\
                  123456789,Short Clinic\n\
                  1234567890,General Clinic\n";

    let strict = run(source, &npi(), ValidationMode::Strict);
    assert_eq!(strict.len(), 1);
    assert_eq!(strict.records[0].code, "1234567890");

    let audit = run(source, &npi(), ValidationMode::Audit);
    assert_eq!(audit.len(), 2);
    assert_eq!(audit.records[0].code, "123456789");
    assert!(!audit.records[0].is_valid);
    assert_eq!(audit.stats.invalid_flagged, 1);
    assert_eq!(audit.columns(), ["code", "description", "is_valid"]);
}

#[test]
fn duplicate_loinc_rows_collapse() {
    let table = run(
        "code,description\n1234-5,Glucose\n1234-5,Glucose\n",
        &loinc(),
        ValidationMode::Strict,
    );
    assert_eq!(table.len(), 1);
    assert_eq!(table.records[0].description, "Glucose");
    assert_eq!(table.stats.duplicates_removed, 1);
}

#[test]
fn npi_organization_name_resolves_through_chain() {
    let events = RefCell::new(Vec::new());
    let reporter = |event: &PipelineEvent| events.borrow_mut().push(event.clone());
    let context = NormalizationContext::new()
        .with_processed_at(stamp())
        .with_reporter(&reporter);
    let source = "NPI,Entity Type Code,Provider Organization Name (Legal Business Name)\n\
                  1234567890,2,General Clinic\n";
    let table =
        normalize_reader(source.as_bytes(), Path::new("npi.csv"), &npi(), &context).unwrap();
    assert_eq!(table.records[0].description, "General Clinic");

    let events = events.borrow();
    assert!(events.iter().any(|event| matches!(
        event,
        PipelineEvent::ColumnResolved {
            field: CanonicalField::Description,
            via,
            fallback: false,
            ..
        } if via == "column 'Provider Organization Name (Legal Business Name)'"
    )));
}

#[test]
fn npi_individual_name_is_joined() {
    let source = "NPI,Provider First Name,Provider Last Name (Legal Name)\n\
                  1234567890,Ada,Lovelace\n";
    let table = run(source, &npi(), ValidationMode::Strict);
    assert_eq!(table.records[0].description, "Ada Lovelace");
}

#[test]
fn who_semicolon_file_uses_positions() {
    let config = CodeSystemConfig::new(
        "icd10who",
        CodeSystem::Icd10Who,
        SourceFormat::delimited(FieldSeparator::Semicolon),
        r"[A-TV-Z]\d{2}(\.[0-9A-TV-Z]{1,4})?",
    )
    .unwrap()
    .with_header(false)
    .with_code_column(vec![ColumnStrategy::position(4)])
    .with_description_column(vec![ColumnStrategy::position(8)]);
    let source = "3;T;X;01;A00.0;A00.0;A00.0;A00;Cholera due to Vibrio cholerae 01, biovar cholerae\n\
                  3;T;X;01;A00.1;A00.1;A00.1;A00;Cholera due to Vibrio cholerae 01, biovar eltor\n";
    let table = run(source, &config, ValidationMode::Strict);
    assert_eq!(table.len(), 2);
    assert_eq!(table.records[1].code, "A00.1");
    assert_eq!(
        table.records[1].description,
        "Cholera due to Vibrio cholerae 01, biovar eltor"
    );
}

#[test]
fn unresolved_column_fails_before_rows() {
    let events = RefCell::new(Vec::new());
    let reporter = |event: &PipelineEvent| events.borrow_mut().push(event.clone());
    let context = NormalizationContext::new().with_reporter(&reporter);
    let err = normalize_reader(
        "LOINC_NUM,COMPONENT\n1234-5,Glucose\n".as_bytes(),
        Path::new("loinc.csv"),
        &loinc(),
        &context,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        NormalizationError::Config(ConfigError::MissingColumn {
            field: CanonicalField::Code,
            ..
        })
    ));
    assert!(
        !events
            .borrow()
            .iter()
            .any(|event| matches!(event, PipelineEvent::Deduplicated { .. }))
    );
}

#[test]
fn malformed_override_applies_to_load() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "code,description\n1234-5,Glucose\n2345-7\n").unwrap();

    let strict = NormalizationContext::new();
    let err = normalize(file.path(), &loinc(), &strict).unwrap_err();
    assert!(matches!(err, NormalizationError::Load(_)));

    let lenient = NormalizationContext::new().with_malformed_policy(MalformedPolicy::Skip);
    let table = normalize(file.path(), &loinc(), &lenient).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.stats.malformed_skipped, 1);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = normalize(
        Path::new("/nonexistent/hcpcs.txt"),
        &hcpcs(),
        &NormalizationContext::new(),
    )
    .unwrap_err();
    assert!(matches!(err, NormalizationError::Load(_)));
}
