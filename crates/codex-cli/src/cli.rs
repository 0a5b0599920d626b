//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use codex_model::ValidationMode;
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "codex",
    version,
    about = "Normalize medical code-system files into clean CSV tables",
    long_about = "Normalize medical code-system reference files into clean CSV tables.\n\n\
                  Supports HCPCS, ICD-10-CM, ICD-10 (WHO), LOINC, NPI, RxNorm and SNOMED CT.\n\
                  Each profile describes how one release file is read; codes are trimmed,\n\
                  validated against the vocabulary's format, and deduplicated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Extra profile file merged over the built-in profiles.
    #[arg(long = "registry", value_name = "FILE", global = true)]
    pub registry: Option<PathBuf>,

    /// Write a JSON summary of every run to this file.
    #[arg(long = "summary-json", value_name = "PATH", global = true)]
    pub summary_json: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize one source file.
    Run(RunArgs),

    /// Run every job of a TOML manifest.
    Batch(BatchArgs),

    /// List the available profiles.
    Systems,

    /// Check codes against a profile's format.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Profile name (see `codex systems`).
    #[arg(value_name = "PROFILE")]
    pub profile: String,

    /// Raw source file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output base path; `.csv` is appended (default: output/<PROFILE>).
    #[arg(long = "output", short = 'o', value_name = "BASE")]
    pub output: Option<PathBuf>,

    /// Strict drops invalid codes; audit keeps them with an is_valid column.
    #[arg(long = "mode", value_enum, default_value = "strict")]
    pub mode: ModeArg,

    #[command(flatten)]
    pub malformed: MalformedArgs,

    /// Write at most N rows.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<usize>,
}

/// Override of the profile's malformed-line policy.
#[derive(Args, Clone, Copy, Default)]
#[group(multiple = false)]
pub struct MalformedArgs {
    /// Skip lines that do not fit the layout.
    #[arg(long = "skip-malformed")]
    pub skip_malformed: bool,

    /// Fail on the first line that does not fit the layout.
    #[arg(long = "fail-on-malformed")]
    pub fail_on_malformed: bool,
}

impl MalformedArgs {
    /// `Some(true)` to skip, `Some(false)` to fail, `None` for the profile default.
    pub fn skip_override(&self) -> Option<bool> {
        if self.skip_malformed {
            Some(true)
        } else if self.fail_on_malformed {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Args)]
pub struct BatchArgs {
    /// Job manifest (TOML).
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct CheckArgs {
    #[arg(value_name = "PROFILE")]
    pub profile: String,

    /// Codes to check; they are cleaned the way the profile cleans source codes.
    #[arg(value_name = "CODE", required = true)]
    pub codes: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Strict,
    Audit,
}

impl From<ModeArg> for ValidationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::Audit => ValidationMode::Audit,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
