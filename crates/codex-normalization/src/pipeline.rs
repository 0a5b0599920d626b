//! The normalization pipeline.
//!
//! `load -> select columns -> clean -> validate -> timestamp -> deduplicate`.
//! Persisting the result is left to the caller.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use codex_ingest::{LoadOptions, load_reader, load_table};
use codex_model::{
    CodeSystemConfig, ConfigError, NormalizationStats, NormalizedRecord, NormalizedTable,
    ProcessedAt, RawRecord, RawTable, ValidationMode,
};

use crate::clean::{clean_description, normalize_code};
use crate::context::NormalizationContext;
use crate::error::Result;
use crate::report::PipelineEvent;
use crate::resolve::{ColumnSelection, ResolvedColumn, resolve_columns};

/// Load `source` and normalize it.
pub fn normalize(
    source: &Path,
    config: &CodeSystemConfig,
    context: &NormalizationContext<'_>,
) -> Result<NormalizedTable> {
    config.validate()?;
    let raw = load_table(source, &load_options(config, context))?;
    Ok(normalize_table(&raw, config, context)?)
}

/// Normalize from any byte source; `origin` names it in errors and logs.
pub fn normalize_reader<R: Read>(
    reader: R,
    origin: &Path,
    config: &CodeSystemConfig,
    context: &NormalizationContext<'_>,
) -> Result<NormalizedTable> {
    config.validate()?;
    let raw = load_reader(reader, origin, &load_options(config, context))?;
    Ok(normalize_table(&raw, config, context)?)
}

fn load_options(config: &CodeSystemConfig, context: &NormalizationContext<'_>) -> LoadOptions {
    let options = LoadOptions::from_config(config);
    match context.malformed {
        Some(policy) => options.with_malformed(policy),
        None => options,
    }
}

/// Normalize an already-loaded table.
///
/// Columns are resolved before any row is touched, so a configuration that
/// does not fit the source fails without partial output.
pub fn normalize_table(
    raw: &RawTable,
    config: &CodeSystemConfig,
    context: &NormalizationContext<'_>,
) -> std::result::Result<NormalizedTable, ConfigError> {
    config.validate()?;
    let reporter = context.reporter;
    let processed_at = context.processed_at.unwrap_or_else(ProcessedAt::now);

    reporter.report(&PipelineEvent::Loaded {
        profile: config.name.clone(),
        system: config.system,
        rows: raw.len(),
        malformed_skipped: raw.malformed_skipped,
    });

    let selection = resolve_columns(raw, config)?;
    report_resolution(context, config, &selection.code);
    report_resolution(context, config, &selection.description);

    let mut stats = NormalizationStats {
        rows_read: raw.len(),
        malformed_skipped: raw.malformed_skipped,
        ..NormalizationStats::default()
    };

    let mut records = Vec::with_capacity(raw.len());
    for row in &raw.records {
        let record = clean_row(row, &selection, config, processed_at);
        if !record.is_valid {
            match context.mode {
                ValidationMode::Strict => {
                    stats.invalid_dropped += 1;
                    tracing::trace!(line = row.line, code = %record.code, "dropping invalid code");
                    continue;
                }
                ValidationMode::Audit => stats.invalid_flagged += 1,
            }
        }
        records.push(record);
    }
    if stats.invalid_dropped > 0 {
        reporter.report(&PipelineEvent::RowsDropped {
            profile: config.name.clone(),
            count: stats.invalid_dropped,
        });
    }

    let (records, removed) = dedupe_records(records);
    stats.duplicates_removed = removed;
    reporter.report(&PipelineEvent::Deduplicated {
        profile: config.name.clone(),
        removed,
    });
    stats.rows_retained = records.len();

    tracing::debug!(
        profile = %config.name,
        mode = %context.mode,
        read = stats.rows_read,
        retained = stats.rows_retained,
        "normalization complete"
    );

    Ok(NormalizedTable {
        profile: config.name.clone(),
        system: config.system,
        mode: context.mode,
        processed_at,
        records,
        stats,
    })
}

fn report_resolution(
    context: &NormalizationContext<'_>,
    config: &CodeSystemConfig,
    column: &ResolvedColumn,
) {
    context.reporter.report(&PipelineEvent::ColumnResolved {
        profile: config.name.clone(),
        field: column.field,
        via: column.resolution.to_string(),
        fallback: column.resolution.is_fallback(),
    });
}

fn clean_row(
    row: &RawRecord,
    selection: &ColumnSelection,
    config: &CodeSystemConfig,
    processed_at: ProcessedAt,
) -> NormalizedRecord {
    let code = normalize_code(
        selection.code.extract(row).as_deref().unwrap_or_default(),
        config,
    );
    let description = clean_description(
        selection.description.extract(row).as_deref(),
        &config.fallback_description,
    );
    let is_valid = config.code_pattern.is_match(&code);
    NormalizedRecord {
        code,
        description,
        is_valid,
        last_updated: processed_at,
    }
}

/// Drop exact duplicates, keeping the first occurrence and the original order.
pub fn dedupe_records(records: Vec<NormalizedRecord>) -> (Vec<NormalizedRecord>, usize) {
    let before = records.len();
    let mut seen = BTreeSet::new();
    let kept: Vec<NormalizedRecord> = records
        .into_iter()
        .filter(|record| {
            seen.insert((
                record.code.clone(),
                record.description.clone(),
                record.is_valid,
                record.last_updated,
            ))
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
