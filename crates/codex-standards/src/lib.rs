//! Code-system profiles for the normalization pipeline.
//!
//! The per-vocabulary configuration is a data table: a TOML document embedded
//! at compile time (see `data/code_systems.toml`) mapping profile names to
//! [`CodeSystemConfig`](codex_model::CodeSystemConfig) definitions. Users can
//! add or override profiles with a file in the same format.
//!
//! # Example
//!
//! ```
//! use codex_standards::CodeSystemRegistry;
//!
//! let registry = CodeSystemRegistry::builtin().unwrap();
//! let npi = registry.get("npi").unwrap();
//! assert!(npi.code_pattern.is_match("1234567890"));
//! ```

#![deny(unsafe_code)]

mod embedded;
mod error;
mod profile;
mod registry;

pub use embedded::BUILTIN_PROFILES;
pub use error::{Result, StandardsError};
pub use profile::ProfileDefinition;
pub use registry::{CodeSystemRegistry, Profile, REGISTRY_ENV_VAR, load_registry};
