//! Profile registry.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use codex_model::{CodeSystem, CodeSystemConfig};

use crate::embedded::BUILTIN_PROFILES;
use crate::error::{Result, StandardsError};
use crate::profile::ProfileDocument;

/// Environment variable naming an extra profile file.
pub const REGISTRY_ENV_VAR: &str = "CODEX_REGISTRY";

/// A resolved profile.
#[derive(Debug, Clone)]
pub struct Profile {
    pub config: CodeSystemConfig,
    pub summary: Option<String>,
    /// Where the profile was defined (`builtin` or a file path).
    pub origin: String,
}

/// Mapping from profile name to configuration.
#[derive(Debug, Clone, Default)]
pub struct CodeSystemRegistry {
    profiles: BTreeMap<String, Profile>,
}

impl CodeSystemRegistry {
    /// Registry with only the embedded profiles.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_PROFILES, "builtin")
    }

    /// Parse a profile document.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let mut registry = Self::default();
        registry.merge_toml_str(content, origin)?;
        Ok(registry)
    }

    /// Add or replace profiles from a document; returns how many were merged.
    pub fn merge_toml_str(&mut self, content: &str, origin: &str) -> Result<usize> {
        let document: ProfileDocument =
            toml::from_str(content).map_err(|source| StandardsError::Toml {
                origin: origin.to_string(),
                source: Box::new(source),
            })?;
        let mut merged = 0usize;
        for (name, definition) in document.profiles {
            let key = profile_key(&name);
            let config = definition.build(&key)?;
            if self.profiles.contains_key(&key) {
                tracing::info!(profile = %key, origin, "overriding profile");
            }
            self.profiles.insert(
                key,
                Profile {
                    config,
                    summary: definition.summary,
                    origin: origin.to_string(),
                },
            );
            merged += 1;
        }
        Ok(merged)
    }

    /// Merge profiles from a TOML file.
    pub fn merge_file(&mut self, path: &Path) -> Result<usize> {
        let content = fs::read_to_string(path).map_err(|source| StandardsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let merged = self.merge_toml_str(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), profiles = merged, "merged profile file");
        Ok(merged)
    }

    /// Look up a profile configuration by name (case-insensitive).
    pub fn get(&self, name: &str) -> Result<&CodeSystemConfig> {
        self.profile(name).map(|profile| &profile.config)
    }

    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(&profile_key(name))
            .ok_or_else(|| StandardsError::UnknownProfile {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    /// Profile names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// Profiles for one vocabulary.
    pub fn for_system(&self, system: CodeSystem) -> impl Iterator<Item = &Profile> {
        self.profiles
            .values()
            .filter(move |profile| profile.config.system == system)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

fn profile_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Built-in profiles plus overrides.
///
/// Resolution order (later wins):
/// 1. Embedded profiles
/// 2. The file named by `CODEX_REGISTRY`, if set
/// 3. `overrides`, if given
pub fn load_registry(overrides: Option<&Path>) -> Result<CodeSystemRegistry> {
    let mut registry = CodeSystemRegistry::builtin()?;
    if let Ok(path) = std::env::var(REGISTRY_ENV_VAR)
        && !path.trim().is_empty()
    {
        registry.merge_file(&PathBuf::from(path))?;
    }
    if let Some(path) = overrides {
        registry.merge_file(path)?;
    }
    Ok(registry)
}
