//! Pipeline progress reporting.
//!
//! The pipeline never installs or configures logging itself. Callers pass a
//! [`PipelineReporter`] and decide where events go.

use std::path::PathBuf;

use codex_model::{CanonicalField, CodeSystem};

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The raw source was parsed.
    Loaded {
        profile: String,
        system: CodeSystem,
        rows: usize,
        malformed_skipped: usize,
    },
    /// A canonical field was bound to source columns.
    ColumnResolved {
        profile: String,
        field: CanonicalField,
        /// Human-readable description of the branch taken.
        via: String,
        fallback: bool,
    },
    /// Rows removed by strict validation.
    RowsDropped { profile: String, count: usize },
    /// Exact duplicates removed.
    Deduplicated { profile: String, removed: usize },
    /// The table was written.
    Persisted {
        profile: String,
        path: PathBuf,
        rows: usize,
    },
}

/// Receiver of [`PipelineEvent`]s.
pub trait PipelineReporter {
    fn report(&self, event: &PipelineEvent);
}

impl<F> PipelineReporter for F
where
    F: Fn(&PipelineEvent),
{
    fn report(&self, event: &PipelineEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl PipelineReporter for NullReporter {
    fn report(&self, _event: &PipelineEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl PipelineReporter for TracingReporter {
    fn report(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::Loaded {
                profile,
                system,
                rows,
                malformed_skipped,
            } => tracing::info!(
                profile = %profile,
                system = %system,
                rows,
                malformed_skipped,
                "loaded records"
            ),
            PipelineEvent::ColumnResolved {
                profile,
                field,
                via,
                fallback,
            } => {
                if *fallback {
                    tracing::warn!(profile = %profile, field = %field, via = %via, "column fallback used");
                } else {
                    tracing::info!(profile = %profile, field = %field, via = %via, "column resolved");
                }
            }
            PipelineEvent::RowsDropped { profile, count } => {
                tracing::info!(profile = %profile, dropped = count, "dropped rows with invalid codes")
            }
            PipelineEvent::Deduplicated { profile, removed } => {
                tracing::info!(profile = %profile, removed, "removed duplicate rows")
            }
            PipelineEvent::Persisted {
                profile,
                path,
                rows,
            } => tracing::info!(profile = %profile, path = %path.display(), rows, "saved output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn closures_are_reporters() {
        let seen = RefCell::new(Vec::new());
        let reporter = |event: &PipelineEvent| seen.borrow_mut().push(event.clone());
        reporter.report(&PipelineEvent::Deduplicated {
            profile: "loinc".to_string(),
            removed: 2,
        });
        NullReporter.report(&PipelineEvent::RowsDropped {
            profile: "loinc".to_string(),
            count: 1,
        });
        assert_eq!(seen.borrow().len(), 1);
    }
}
