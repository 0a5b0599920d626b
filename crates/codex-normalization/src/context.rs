//! Per-run settings.

use codex_ingest::MalformedPolicy;
use codex_model::{ProcessedAt, ValidationMode};

use crate::report::{NullReporter, PipelineReporter};

/// Settings chosen by the caller for one run.
///
/// ```
/// use codex_model::ValidationMode;
/// use codex_normalization::{NormalizationContext, TracingReporter};
///
/// let reporter = TracingReporter;
/// let context = NormalizationContext::new()
///     .with_mode(ValidationMode::Audit)
///     .with_reporter(&reporter);
/// assert_eq!(context.mode, ValidationMode::Audit);
/// ```
#[derive(Clone, Copy)]
pub struct NormalizationContext<'a> {
    pub mode: ValidationMode,
    /// Fixed processing time; taken from the clock once per run when unset.
    pub processed_at: Option<ProcessedAt>,
    /// Overrides the profile's malformed-line default.
    pub malformed: Option<MalformedPolicy>,
    pub reporter: &'a dyn PipelineReporter,
}

impl Default for NormalizationContext<'_> {
    fn default() -> Self {
        Self {
            mode: ValidationMode::Strict,
            processed_at: None,
            malformed: None,
            reporter: &NullReporter,
        }
    }
}

impl<'a> NormalizationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_processed_at(mut self, processed_at: ProcessedAt) -> Self {
        self.processed_at = Some(processed_at);
        self
    }

    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = Some(policy);
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: &'a dyn PipelineReporter) -> Self {
        self.reporter = reporter;
        self
    }
}

impl std::fmt::Debug for NormalizationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizationContext")
            .field("mode", &self.mode)
            .field("processed_at", &self.processed_at)
            .field("malformed", &self.malformed)
            .finish_non_exhaustive()
    }
}
