//! Batch manifests.
//!
//! A manifest is a TOML file listing jobs:
//!
//! ```toml
//! [[jobs]]
//! name = "hcpcs-2025"
//! profile = "hcpcs"
//! inputs = ["data/HCPC2025_full.txt", "data/HCPC2025_sample.txt"]
//! output = "output/hcpcs_2025"
//! mode = "audit"
//! ```
//!
//! `inputs` are tried in order and the first existing file is used. Relative
//! paths resolve against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use codex_model::ValidationMode;
use serde::Deserialize;

use crate::pipeline::JobSpec;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchManifest {
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobEntry {
    pub name: Option<String>,
    pub profile: String,
    /// Candidate source files, most preferred first.
    pub inputs: Vec<PathBuf>,
    /// Output base path; `.csv` is appended.
    pub output: PathBuf,
    #[serde(default)]
    pub mode: ValidationMode,
    pub skip_malformed: Option<bool>,
    pub limit: Option<usize>,
}

impl BatchManifest {
    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read manifest {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_toml_str(&content, base_dir)
            .with_context(|| format!("parse manifest {}", path.display()))
    }

    /// Parse a manifest, resolving relative paths against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self> {
        let mut manifest: Self = toml::from_str(content)?;
        for (index, job) in manifest.jobs.iter_mut().enumerate() {
            if job.profile.trim().is_empty() {
                bail!("job {} has an empty profile", index + 1);
            }
            if job.inputs.is_empty() {
                bail!("job {} ({}) lists no inputs", index + 1, job.display_name());
            }
            for input in &mut job.inputs {
                *input = resolve(base_dir, input);
            }
            job.output = resolve(base_dir, &job.output);
        }
        Ok(manifest)
    }
}

impl JobEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.profile)
    }

    /// The first listed input that exists.
    pub fn select_input(&self) -> Option<&Path> {
        let (index, path) = self
            .inputs
            .iter()
            .enumerate()
            .find(|(_, path)| path.is_file())?;
        if index > 0 {
            tracing::info!(
                job = self.display_name(),
                path = %path.display(),
                skipped = index,
                "preferred input missing, using fallback"
            );
        } else {
            tracing::debug!(job = self.display_name(), path = %path.display(), "using input");
        }
        Some(path)
    }

    /// Job description for the selected input, or `None` when no input exists.
    pub fn to_spec(&self) -> Option<JobSpec> {
        let input = self.select_input()?;
        let mut spec = JobSpec::new(self.profile.trim(), input, self.output.clone())
            .with_mode(self.mode)
            .with_skip_malformed(self.skip_malformed)
            .with_limit(self.limit);
        spec.name = self.display_name().to_string();
        Some(spec)
    }

    /// Error text for a job whose inputs are all missing.
    pub fn missing_inputs_message(&self) -> String {
        let listed = self
            .inputs
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        format!("none of the inputs exist: {listed}")
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_follow_manifest() {
        let manifest = BatchManifest::from_toml_str(
            r#"
            [[jobs]]
            profile = "loinc"
            inputs = ["raw/Loinc.csv", "/abs/Loinc_sample.csv"]
            output = "out/loinc"
            "#,
            Path::new("/work"),
        )
        .unwrap();
        let job = &manifest.jobs[0];
        assert_eq!(job.inputs[0], PathBuf::from("/work/raw/Loinc.csv"));
        assert_eq!(job.inputs[1], PathBuf::from("/abs/Loinc_sample.csv"));
        assert_eq!(job.output, PathBuf::from("/work/out/loinc"));
        assert_eq!(job.mode, ValidationMode::Strict);
        assert_eq!(job.display_name(), "loinc");
    }

    #[test]
    fn job_without_inputs_is_rejected() {
        let err = BatchManifest::from_toml_str(
            "[[jobs]]\nprofile = \"npi\"\ninputs = []\noutput = \"out/npi\"\n",
            Path::new(""),
        )
        .unwrap_err();
        assert!(err.to_string().contains("lists no inputs"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = BatchManifest::from_toml_str(
            "[[jobs]]\nprofile = \"npi\"\ninputs = [\"a\"]\noutput = \"b\"\nfromat = \"x\"\n",
            Path::new(""),
        );
        assert!(result.is_err());
    }
}
