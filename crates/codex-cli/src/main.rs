//! Medical code-system normalization CLI.

use clap::{ColorChoice, Parser};
use codex_cli::logging::{LogConfig, LogFormat, init_logging};
use codex_cli::types::write_summary_json;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{RunResult, open_registry, run_batch, run_check, run_run, run_systems};
use crate::summary::{print_check_results, print_run_summaries};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let registry = match open_registry(cli.registry.as_deref()) {
        Ok(registry) => registry,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let exit_code = match &cli.command {
        Command::Run(args) => finish_run(&cli, run_run(&registry, args)),
        Command::Batch(args) => finish_run(&cli, run_batch(&registry, args)),
        Command::Systems => match run_systems(&registry) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Check(args) => match run_check(&registry, args) {
            Ok(results) => {
                print_check_results(&args.profile, &results);
                if results.iter().all(|result| result.is_valid) { 0 } else { 1 }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn finish_run(cli: &Cli, result: anyhow::Result<RunResult>) -> i32 {
    match result {
        Ok(result) => {
            print_run_summaries(&result.summaries);
            if let Some(path) = &cli.summary_json
                && let Err(error) = write_summary_json(path, &result.summaries)
            {
                eprintln!("error: {error:#}");
                return 1;
            }
            if result.has_errors { 1 } else { 0 }
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
