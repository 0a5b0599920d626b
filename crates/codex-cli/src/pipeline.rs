//! One normalization job: resolve profile, normalize, persist.

use std::path::{Path, PathBuf};

use codex_ingest::MalformedPolicy;
use codex_model::{NormalizedTable, ValidationMode};
use codex_normalization::{
    NormalizationContext, NormalizationError, PipelineEvent, PipelineReporter, normalize,
};
use codex_output::{PersistError, PersistOptions, PersistOutcome, persist};
use codex_standards::{CodeSystemRegistry, StandardsError};
use thiserror::Error;
use tracing::info_span;

/// Everything needed to run one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    /// Label used in logs and summaries.
    pub name: String,
    pub profile: String,
    pub input: PathBuf,
    /// Output base path; `.csv` is appended.
    pub output: PathBuf,
    pub mode: ValidationMode,
    /// Overrides the profile's malformed-line default when set.
    pub skip_malformed: Option<bool>,
    pub limit: Option<usize>,
}

impl JobSpec {
    pub fn new(profile: impl Into<String>, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let profile = profile.into();
        Self {
            name: profile.clone(),
            profile,
            input: input.into(),
            output: output.into(),
            mode: ValidationMode::Strict,
            skip_malformed: None,
            limit: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_skip_malformed(mut self, skip: Option<bool>) -> Self {
        self.skip_malformed = skip;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}

/// A job that ran to completion.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub table: NormalizedTable,
    pub persisted: PersistOutcome,
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Profile(#[from] StandardsError),

    #[error(transparent)]
    Normalize(#[from] NormalizationError),

    /// The table was built but could not be written; it is returned for retry.
    #[error("normalized {} rows but could not save them: {source}", table.len())]
    Persist {
        #[source]
        source: PersistError,
        table: Box<NormalizedTable>,
    },
}

impl JobError {
    /// The normalized table, when the failure happened while saving it.
    pub fn table(&self) -> Option<&NormalizedTable> {
        match self {
            Self::Persist { table, .. } => Some(table),
            _ => None,
        }
    }

    /// The file or directory a failed save was working on.
    pub fn persist_path(&self) -> Option<&Path> {
        match self {
            Self::Persist { source, .. } => Some(source.path().as_path()),
            _ => None,
        }
    }

    pub fn into_table(self) -> Option<NormalizedTable> {
        match self {
            Self::Persist { table, .. } => Some(*table),
            _ => None,
        }
    }
}

/// Run one job against `registry`.
pub fn run_job(
    registry: &CodeSystemRegistry,
    spec: &JobSpec,
    reporter: &dyn PipelineReporter,
) -> Result<JobOutcome, JobError> {
    let config = registry.get(&spec.profile)?;
    let span = info_span!("job", name = %spec.name, profile = %config.name);
    let _guard = span.enter();

    let mut context = NormalizationContext::new()
        .with_mode(spec.mode)
        .with_reporter(reporter);
    if let Some(skip) = spec.skip_malformed {
        context = context.with_malformed_policy(MalformedPolicy::from_skip(skip));
    }

    let table = normalize(&spec.input, config, &context)?;
    save(table, spec, reporter)
}

/// Persist an already-normalized table for `spec`.
///
/// Also the retry path for [`JobError::Persist`].
pub fn save(
    table: NormalizedTable,
    spec: &JobSpec,
    reporter: &dyn PipelineReporter,
) -> Result<JobOutcome, JobError> {
    let options = PersistOptions::default().with_limit(spec.limit);
    match persist(&table, &spec.output, &options) {
        Ok(persisted) => {
            reporter.report(&PipelineEvent::Persisted {
                profile: table.profile.clone(),
                path: persisted.path.clone(),
                rows: persisted.rows_written,
            });
            Ok(JobOutcome { table, persisted })
        }
        Err(source) => Err(JobError::Persist {
            source,
            table: Box::new(table),
        }),
    }
}
