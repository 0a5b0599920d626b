//! Embedded profile data.

/// Built-in profile table, embedded with `include_str!()` for offline use.
pub const BUILTIN_PROFILES: &str = include_str!("../data/code_systems.toml");
