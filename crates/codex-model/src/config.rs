//! Per-vocabulary configuration.
//!
//! A [`CodeSystemConfig`] is plain data: how the raw file is split into fields,
//! which fields become the canonical `code` and `description` columns, and the
//! pattern a cleaned code must fully match.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::system::CodeSystem;

/// Description substituted when a source row has none.
pub const DEFAULT_FALLBACK_DESCRIPTION: &str = "No description";

/// Canonical output field produced by column selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Code,
    Description,
}

impl CanonicalField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field separator for delimited sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSeparator {
    Comma,
    Tab,
    Pipe,
    Semicolon,
    /// Sniffed from the first non-empty line.
    Auto,
}

impl FieldSeparator {
    /// The separator byte, or `None` for [`FieldSeparator::Auto`].
    pub const fn byte(&self) -> Option<u8> {
        match self {
            Self::Comma => Some(b','),
            Self::Tab => Some(b'\t'),
            Self::Pipe => Some(b'|'),
            Self::Semicolon => Some(b';'),
            Self::Auto => None,
        }
    }

    /// Concrete separators considered when sniffing.
    pub const fn candidates() -> &'static [FieldSeparator] {
        &[Self::Comma, Self::Pipe, Self::Tab, Self::Semicolon]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Comma => "comma",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
            Self::Semicolon => "semicolon",
            Self::Auto => "auto",
        }
    }
}

/// A named field at a fixed character range of each line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedField {
    pub name: String,
    /// Zero-based start character offset.
    pub start: usize,
    /// Exclusive end offset; `None` reads to end of line.
    #[serde(default)]
    pub end: Option<usize>,
}

impl FixedField {
    pub fn new(name: impl Into<String>, start: usize, end: Option<usize>) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }
}

/// How a raw source is split into fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Character-separated values.
    Delimited {
        separator: FieldSeparator,
        /// Honor `"` quoting. Off for registries whose text holds bare quotes.
        #[serde(default = "default_quoting")]
        quoting: bool,
    },
    /// Fixed-position columns; field names come from the layout.
    FixedWidth { fields: Vec<FixedField> },
    /// WHO ClaML XML, with a pipe-delimited fallback.
    Claml,
}

fn default_quoting() -> bool {
    true
}

impl SourceFormat {
    pub fn delimited(separator: FieldSeparator) -> Self {
        Self::Delimited {
            separator,
            quoting: true,
        }
    }

    /// Short label for listings and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Delimited { separator, .. } => separator.as_str().to_string(),
            Self::FixedWidth { fields } => format!("fixed-width ({} fields)", fields.len()),
            Self::Claml => "claml".to_string(),
        }
    }
}

/// One way of locating a canonical field in the raw source.
///
/// Strategies are evaluated in order; the first that resolves wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnStrategy {
    /// Header name, matched case-insensitively after trimming.
    Named { name: String },
    /// Zero-based field position.
    Position { position: usize },
    /// Several named columns joined with a separator, skipping empty parts.
    Joined {
        join: Vec<String>,
        #[serde(default = "default_join_separator")]
        separator: String,
    },
}

fn default_join_separator() -> String {
    " ".to_string()
}

impl ColumnStrategy {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named { name: name.into() }
    }

    pub fn position(position: usize) -> Self {
        Self::Position { position }
    }

    pub fn joined<I, S>(columns: I, separator: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Joined {
            join: columns.into_iter().map(Into::into).collect(),
            separator: separator.into(),
        }
    }

    /// Identifier used to compare strategies for distinctness.
    pub fn identifier(&self) -> String {
        match self {
            Self::Named { name } => name.trim().to_ascii_lowercase(),
            Self::Position { position } => format!("#{position}"),
            Self::Joined { join, .. } => join
                .iter()
                .map(|name| name.trim().to_ascii_lowercase())
                .collect::<Vec<_>>()
                .join("+"),
        }
    }
}

impl fmt::Display for ColumnStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name } => write!(f, "column '{name}'"),
            Self::Position { position } => write!(f, "position {position}"),
            Self::Joined { join, .. } => write!(f, "joined [{}]", join.join(", ")),
        }
    }
}

/// Validation policy, fixed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Drop rows whose code does not match.
    #[default]
    Strict,
    /// Keep every row and flag validity.
    Audit,
}

impl ValidationMode {
    /// Output header for this mode.
    pub const fn output_columns(&self) -> [&'static str; 3] {
        match self {
            Self::Strict => ["code", "description", "last_updated"],
            Self::Audit => ["code", "description", "is_valid"],
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A code pattern compiled with full-string anchoring.
#[derive(Debug, Clone)]
pub struct CodePattern {
    source: String,
    regex: Regex,
}

impl CodePattern {
    /// Compile `pattern` so that only whole-string matches pass.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as configured, without anchors.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, code: &str) -> bool {
        self.regex.is_match(code)
    }
}

impl PartialEq for CodePattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for CodePattern {}

/// Configuration for one vocabulary profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSystemConfig {
    /// Profile identifier (registry key).
    pub name: String,
    pub system: CodeSystem,
    pub format: SourceFormat,
    pub has_header: bool,
    /// Ordered resolution strategies for the `code` field.
    pub code_column: Vec<ColumnStrategy>,
    /// Ordered resolution strategies for the `description` field.
    pub description_column: Vec<ColumnStrategy>,
    pub code_pattern: CodePattern,
    pub uppercase_codes: bool,
    pub fallback_description: String,
    /// Skip malformed lines instead of failing the load.
    pub skip_malformed: bool,
    /// Use columns 0 and 1 when no strategy resolves.
    pub positional_fallback: bool,
    /// Insert a `.` after this many characters of a code stored without one
    /// (`A000` becomes `A00.0`).
    pub decimal_after: Option<usize>,
}

impl CodeSystemConfig {
    /// Create a config with canonical column names and system defaults.
    pub fn new(
        name: impl Into<String>,
        system: CodeSystem,
        format: SourceFormat,
        code_pattern: &str,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if code_pattern.trim().is_empty() {
            return Err(ConfigError::EmptyPattern { profile: name });
        }
        let compiled = CodePattern::new(code_pattern).map_err(|e| ConfigError::InvalidPattern {
            profile: name.clone(),
            pattern: code_pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            name,
            system,
            format,
            has_header: true,
            code_column: vec![ColumnStrategy::named("code")],
            description_column: vec![ColumnStrategy::named("description")],
            code_pattern: compiled,
            uppercase_codes: system.uppercase_by_default(),
            fallback_description: DEFAULT_FALLBACK_DESCRIPTION.to_string(),
            skip_malformed: false,
            positional_fallback: false,
            decimal_after: None,
        })
    }

    #[must_use]
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    #[must_use]
    pub fn with_code_column(mut self, strategies: Vec<ColumnStrategy>) -> Self {
        self.code_column = strategies;
        self
    }

    #[must_use]
    pub fn with_description_column(mut self, strategies: Vec<ColumnStrategy>) -> Self {
        self.description_column = strategies;
        self
    }

    #[must_use]
    pub fn with_uppercase_codes(mut self, enable: bool) -> Self {
        self.uppercase_codes = enable;
        self
    }

    #[must_use]
    pub fn with_fallback_description(mut self, fallback: impl Into<String>) -> Self {
        self.fallback_description = fallback.into();
        self
    }

    #[must_use]
    pub fn with_skip_malformed(mut self, enable: bool) -> Self {
        self.skip_malformed = enable;
        self
    }

    #[must_use]
    pub fn with_positional_fallback(mut self, enable: bool) -> Self {
        self.positional_fallback = enable;
        self
    }

    #[must_use]
    pub fn with_decimal_after(mut self, position: Option<usize>) -> Self {
        self.decimal_after = position;
        self
    }

    /// Strategies for one canonical field.
    pub fn strategies(&self, field: CanonicalField) -> &[ColumnStrategy] {
        match field {
            CanonicalField::Code => &self.code_column,
            CanonicalField::Description => &self.description_column,
        }
    }

    /// Check the structural invariants of this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_pattern.as_str().trim().is_empty() {
            return Err(ConfigError::EmptyPattern {
                profile: self.name.clone(),
            });
        }
        for field in [CanonicalField::Code, CanonicalField::Description] {
            let strategies = self.strategies(field);
            if strategies.is_empty() {
                return Err(ConfigError::MissingStrategies {
                    profile: self.name.clone(),
                    field,
                });
            }
            for strategy in strategies {
                if let ColumnStrategy::Joined { join, .. } = strategy
                    && join.is_empty()
                {
                    return Err(ConfigError::InvalidConfig {
                        profile: self.name.clone(),
                        reason: format!("{field} has a joined strategy with no columns"),
                    });
                }
            }
        }
        if self.decimal_after == Some(0) {
            return Err(ConfigError::InvalidConfig {
                profile: self.name.clone(),
                reason: "decimal_after must be at least 1".to_string(),
            });
        }
        let code = self.code_column[0].identifier();
        let description = self.description_column[0].identifier();
        if code == description {
            return Err(ConfigError::DuplicateColumns {
                profile: self.name.clone(),
                column: code,
            });
        }
        if let SourceFormat::FixedWidth { fields } = &self.format {
            if fields.is_empty() {
                return Err(ConfigError::InvalidConfig {
                    profile: self.name.clone(),
                    reason: "fixed-width layout has no fields".to_string(),
                });
            }
            for field in fields {
                if field.end.is_some_and(|end| end <= field.start) {
                    return Err(ConfigError::InvalidConfig {
                        profile: self.name.clone(),
                        reason: format!("fixed-width field '{}' has an empty range", field.name),
                    });
                }
            }
        }
        Ok(())
    }
}
