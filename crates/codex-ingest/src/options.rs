//! Load options derived from a profile.

use codex_model::{CodeSystemConfig, RawTable, SourceFormat};

use crate::error::{IngestError, Result};

/// What to do with a line that does not fit the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedPolicy {
    /// Abort the load at the first malformed line.
    #[default]
    Fail,
    /// Skip and count malformed lines.
    Skip,
}

impl MalformedPolicy {
    pub fn from_skip(skip: bool) -> Self {
        if skip { Self::Skip } else { Self::Fail }
    }

    pub fn skips(&self) -> bool {
        matches!(self, Self::Skip)
    }

    /// Count `error` against `table` when skipping, otherwise return it.
    pub(crate) fn handle(&self, table: &mut RawTable, error: IngestError) -> Result<()> {
        match self {
            Self::Fail => Err(error),
            Self::Skip => {
                tracing::debug!(line = error.line(), %error, "skipping malformed line");
                table.malformed_skipped += 1;
                Ok(())
            }
        }
    }
}

/// How to parse one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub format: SourceFormat,
    pub has_header: bool,
    pub malformed: MalformedPolicy,
}

impl LoadOptions {
    pub fn new(format: SourceFormat, has_header: bool) -> Self {
        Self {
            format,
            has_header,
            malformed: MalformedPolicy::Fail,
        }
    }

    /// Options from a profile, using its malformed-line default.
    pub fn from_config(config: &CodeSystemConfig) -> Self {
        Self {
            format: config.format.clone(),
            has_header: config.has_header,
            malformed: MalformedPolicy::from_skip(config.skip_malformed),
        }
    }

    #[must_use]
    pub fn with_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }
}
