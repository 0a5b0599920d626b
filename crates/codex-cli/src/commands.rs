use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{info, info_span, warn};

use codex_cli::manifest::BatchManifest;
use codex_cli::pipeline::{JobSpec, run_job};
use codex_cli::types::RunSummary;
use codex_model::{ColumnStrategy, SourceFormat};
use codex_normalization::{TracingReporter, normalize_code};
use codex_standards::{CodeSystemRegistry, load_registry};

use crate::cli::{BatchArgs, CheckArgs, RunArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell};

/// Default directory for outputs of `codex run`.
const DEFAULT_OUTPUT_DIR: &str = "output";

/// Results of a `run` or `batch` invocation.
#[derive(Debug)]
pub struct RunResult {
    pub summaries: Vec<RunSummary>,
    pub has_errors: bool,
}

impl RunResult {
    fn new(summaries: Vec<RunSummary>) -> Self {
        let has_errors = summaries.iter().any(RunSummary::is_failure);
        Self {
            summaries,
            has_errors,
        }
    }
}

/// One code checked by `codex check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub input: String,
    pub cleaned: String,
    pub is_valid: bool,
}

pub fn open_registry(path: Option<&Path>) -> Result<CodeSystemRegistry> {
    load_registry(path).context("load profiles")
}

pub fn run_run(registry: &CodeSystemRegistry, args: &RunArgs) -> Result<RunResult> {
    // Fail before any I/O when the profile is unknown.
    let config = registry.get(&args.profile)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR).join(&config.name));
    let spec = JobSpec::new(config.name.clone(), args.input.clone(), output)
        .with_mode(args.mode.into())
        .with_skip_malformed(args.malformed.skip_override())
        .with_limit(args.limit);

    let summary = match run_job(registry, &spec, &TracingReporter) {
        Ok(outcome) => RunSummary::succeeded(&spec, &outcome),
        Err(error) => RunSummary::failed(&spec, &error),
    };
    Ok(RunResult::new(vec![summary]))
}

/// Run every job in the manifest; a failed job does not stop the rest.
pub fn run_batch(registry: &CodeSystemRegistry, args: &BatchArgs) -> Result<RunResult> {
    let manifest = BatchManifest::load(&args.manifest)?;
    let batch_span = info_span!("batch", manifest = %args.manifest.display());
    let _batch_guard = batch_span.enter();
    info!(jobs = manifest.jobs.len(), "starting batch");

    let mut summaries = Vec::with_capacity(manifest.jobs.len());
    for job in &manifest.jobs {
        let Some(spec) = job.to_spec() else {
            let message = job.missing_inputs_message();
            warn!(job = job.display_name(), "{message}");
            summaries.push(RunSummary::not_started(
                job.display_name(),
                job.profile.clone(),
                job.mode,
                message,
            ));
            continue;
        };
        let summary = match run_job(registry, &spec, &TracingReporter) {
            Ok(outcome) => RunSummary::succeeded(&spec, &outcome),
            Err(error) => {
                warn!(job = %spec.name, %error, "job failed");
                RunSummary::failed(&spec, &error)
            }
        };
        summaries.push(summary);
    }
    Ok(RunResult::new(summaries))
}

pub fn run_systems(registry: &CodeSystemRegistry) -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Profile"),
        header_cell("System"),
        header_cell("Format"),
        header_cell("Code"),
        header_cell("Description"),
        header_cell("Pattern"),
        header_cell("Malformed"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 6, CellAlignment::Center);
    for profile in registry.profiles() {
        let config = &profile.config;
        table.add_row(vec![
            Cell::new(&config.name),
            Cell::new(config.system.label()),
            Cell::new(format_cell_text(&config.format, config.has_header)),
            Cell::new(strategies_text(&config.code_column)),
            Cell::new(strategies_text(&config.description_column)),
            Cell::new(config.code_pattern.as_str()),
            if config.skip_malformed {
                Cell::new("skip")
            } else {
                dim_cell("fail")
            },
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_check(registry: &CodeSystemRegistry, args: &CheckArgs) -> Result<Vec<CheckResult>> {
    let config = registry.get(&args.profile)?;
    Ok(args
        .codes
        .iter()
        .map(|input| {
            let cleaned = normalize_code(input, config);
            let is_valid = config.code_pattern.is_match(&cleaned);
            CheckResult {
                input: input.clone(),
                cleaned,
                is_valid,
            }
        })
        .collect())
}

fn format_cell_text(format: &SourceFormat, has_header: bool) -> String {
    if has_header {
        format!("{}, header", format.describe())
    } else {
        format.describe()
    }
}

fn strategies_text(strategies: &[ColumnStrategy]) -> String {
    strategies
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_applies_profile_decimal_point() {
        let registry = CodeSystemRegistry::builtin().unwrap();
        let args = CheckArgs {
            profile: "icd10cm-order".to_string(),
            codes: vec!["a000".to_string(), "A00.0".to_string(), "A0".to_string()],
        };
        let results = run_check(&registry, &args).unwrap();
        let cleaned: Vec<_> = results.iter().map(|r| (r.cleaned.as_str(), r.is_valid)).collect();
        assert_eq!(cleaned, [("A00.0", true), ("A00.0", true), ("A0", false)]);
    }
}
