//! pitwall command line tool.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use pitwall_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_features, run_teams};
use crate::summary::print_summary;
use crate::types::FeaturesResult;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Features(args) => match run_features(args) {
            Ok(result) => {
                print_summary(&result);
                features_exit_code(args.fail_on_issues, &result)
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Teams(args) => match run_teams(args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// A successful run exits non-zero only when asked to treat excluded records
/// as a failure.
fn features_exit_code(fail_on_issues: bool, result: &FeaturesResult) -> i32 {
    if fail_on_issues && result.has_issues() {
        1
    } else {
        0
    }
}

/// Logging configuration from CLI flags. An explicit level (`--log-level`,
/// `-v`, `-q`) takes precedence over `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level_filter(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_timestamps(cli.log_file.is_some())
        .with_target(level_filter >= LevelFilter::DEBUG)
        .with_ansi(with_ansi)
        .with_log_file(cli.log_file.clone())
}

#[cfg(test)]
mod tests {
    use pitwall_model::{ParseIssue, RunReport};

    use super::*;

    fn result(parse_issues: Vec<ParseIssue>) -> FeaturesResult {
        FeaturesResult {
            report: RunReport {
                excluded_records: parse_issues.len(),
                parse_issues,
                output_rows: 2,
                output_columns: 16,
                ..RunReport::default()
            },
            window: 5,
            normalized: false,
            written: Vec::new(),
        }
    }

    fn issue() -> ParseIssue {
        ParseIssue {
            season: 2024,
            event: "Australia".to_string(),
            driver: "Lewis Hamilton".to_string(),
            field: "seg1_time".to_string(),
            raw: "1:1x.2".to_string(),
            message: "invalid lap time".to_string(),
        }
    }

    #[test]
    fn issues_fail_the_run_only_when_requested() {
        assert_eq!(features_exit_code(true, &result(vec![issue()])), 1);
        assert_eq!(features_exit_code(false, &result(vec![issue()])), 0);
    }

    #[test]
    fn clean_run_succeeds_under_fail_on_issues() {
        assert_eq!(features_exit_code(true, &result(Vec::new())), 0);
    }

    #[test]
    fn explicit_level_disables_rust_log() {
        let cli = Cli::parse_from(["pitwall", "--log-level", "debug", "teams"]);
        let config = log_config_from_cli(&cli);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert!(!config.use_env_filter);
        assert!(config.with_target);
        assert!(!config.with_timestamps);
    }
}
