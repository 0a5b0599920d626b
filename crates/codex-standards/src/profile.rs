//! Serialized profile definitions.

use std::collections::BTreeMap;

use codex_model::{
    CodeSystem, CodeSystemConfig, ColumnStrategy, ConfigError, DEFAULT_FALLBACK_DESCRIPTION,
    SourceFormat,
};
use serde::Deserialize;

/// Top-level layout of a profile document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ProfileDocument {
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileDefinition>,
}

/// One `[profiles.<name>]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDefinition {
    pub system: CodeSystem,
    #[serde(default)]
    pub summary: Option<String>,
    pub format: SourceFormat,
    #[serde(default = "default_true")]
    pub has_header: bool,
    pub code_pattern: String,
    pub code_column: Vec<ColumnStrategy>,
    pub description_column: Vec<ColumnStrategy>,
    /// Defaults to the system's convention when absent.
    #[serde(default)]
    pub uppercase_codes: Option<bool>,
    #[serde(default = "default_fallback")]
    pub fallback_description: String,
    #[serde(default)]
    pub skip_malformed: bool,
    #[serde(default)]
    pub positional_fallback: bool,
    /// Codes stored without their decimal point get one after this many characters.
    #[serde(default)]
    pub decimal_after: Option<usize>,
}

fn default_true() -> bool {
    true
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_DESCRIPTION.to_string()
}

impl ProfileDefinition {
    /// Build and check the configuration for profile `name`.
    pub fn build(&self, name: &str) -> Result<CodeSystemConfig, ConfigError> {
        let config = CodeSystemConfig::new(
            name,
            self.system,
            self.format.clone(),
            &self.code_pattern,
        )?
        .with_header(self.has_header)
        .with_code_column(self.code_column.clone())
        .with_description_column(self.description_column.clone())
        .with_uppercase_codes(
            self.uppercase_codes
                .unwrap_or_else(|| self.system.uppercase_by_default()),
        )
        .with_fallback_description(self.fallback_description.clone())
        .with_skip_malformed(self.skip_malformed)
        .with_positional_fallback(self.positional_fallback)
        .with_decimal_after(self.decimal_after);
        config.validate()?;
        Ok(config)
    }
}
