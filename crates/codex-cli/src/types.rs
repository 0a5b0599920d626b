//! Run results shared by the terminal and JSON summaries.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codex_model::{CodeSystem, NormalizationStats, ValidationMode};
use serde::Serialize;

use crate::pipeline::{JobError, JobOutcome, JobSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Succeeded,
    Failed,
}

/// Outcome of one job, successful or not.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub job: String,
    pub profile: String,
    pub system: Option<CodeSystem>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub mode: ValidationMode,
    pub processed_at: Option<String>,
    pub stats: Option<NormalizationStats>,
    pub rows_written: usize,
    pub rows_omitted: usize,
    pub status: RunStatus,
    pub error: Option<String>,
    /// Where saving failed, when the table was built but not written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn succeeded(spec: &JobSpec, outcome: &JobOutcome) -> Self {
        Self {
            job: spec.name.clone(),
            profile: outcome.table.profile.clone(),
            system: Some(outcome.table.system),
            input: Some(spec.input.clone()),
            output: Some(outcome.persisted.path.clone()),
            mode: outcome.table.mode,
            processed_at: Some(outcome.table.processed_at.to_string()),
            stats: Some(outcome.table.stats),
            rows_written: outcome.persisted.rows_written,
            rows_omitted: outcome.persisted.rows_omitted,
            status: RunStatus::Succeeded,
            error: None,
            failed_path: None,
        }
    }

    /// A failed job; statistics are kept when the table was built before the failure.
    pub fn failed(spec: &JobSpec, error: &JobError) -> Self {
        let table = error.table();
        Self {
            job: spec.name.clone(),
            profile: spec.profile.clone(),
            system: table.map(|table| table.system),
            input: Some(spec.input.clone()),
            output: None,
            mode: spec.mode,
            processed_at: table.map(|table| table.processed_at.to_string()),
            stats: table.map(|table| table.stats),
            rows_written: 0,
            rows_omitted: 0,
            status: RunStatus::Failed,
            error: Some(error.to_string()),
            failed_path: error.persist_path().map(Path::to_path_buf),
        }
    }

    /// A job that never started.
    pub fn not_started(
        job: impl Into<String>,
        profile: impl Into<String>,
        mode: ValidationMode,
        error: impl Into<String>,
    ) -> Self {
        Self {
            job: job.into(),
            profile: profile.into(),
            system: None,
            input: None,
            output: None,
            mode,
            processed_at: None,
            stats: None,
            rows_written: 0,
            rows_omitted: 0,
            status: RunStatus::Failed,
            error: Some(error.into()),
            failed_path: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.status == RunStatus::Failed
    }
}

/// Write `summaries` as pretty-printed JSON.
pub fn write_summary_json(path: &Path, summaries: &[RunSummary]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summaries)
        .with_context(|| format!("write summary {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("write summary {}", path.display()))
}
