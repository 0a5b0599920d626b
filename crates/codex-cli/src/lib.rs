//! Library side of the `codex` binary: logging setup, job execution and
//! batch manifests.

pub mod logging;
pub mod manifest;
pub mod pipeline;
pub mod types;
