//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pitwall",
    version,
    about = "Race result feature engineering - turn qualifying and race tables into model inputs",
    long_about = "Join per-event qualifying and race result tables, cleanse status codes and \
                  lap times, and derive leakage-free features: team DNFs and driver points \
                  earlier in the season, rolling finishing form and the gap to pole."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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
    /// Derive the feature table from qualifying and race results.
    Features(FeaturesArgs),

    /// List the active team alias table.
    Teams(TeamsArgs),
}

#[derive(Parser)]
pub struct FeaturesArgs {
    /// Qualifying results CSV.
    #[arg(long = "qualifying", value_name = "CSV")]
    pub qualifying: PathBuf,

    /// Race results CSV.
    #[arg(long = "race", value_name = "CSV")]
    pub race: PathBuf,

    /// Output path of the feature table CSV.
    #[arg(short = 'o', long = "output", value_name = "CSV")]
    pub output: PathBuf,

    /// Run configuration (TOML) with feature options and an alias file.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Team alias table (TOML) replacing the configured or embedded one.
    #[arg(long = "teams", value_name = "TOML")]
    pub teams: Option<PathBuf>,

    /// Write the run report (join counts, excluded records) as JSON.
    #[arg(long = "report", value_name = "JSON")]
    pub report: Option<PathBuf>,

    /// Encode against a pinned category vocabulary (JSON).
    ///
    /// Drivers, teams and events missing from the vocabulary encode as all
    /// zeros, so the output columns stay the same between training and
    /// inference runs.
    #[arg(long = "vocabulary", value_name = "JSON")]
    pub vocabulary: Option<PathBuf>,

    /// Save the vocabulary used for encoding (JSON).
    #[arg(long = "save-vocabulary", value_name = "JSON")]
    pub save_vocabulary: Option<PathBuf>,

    /// Number of prior events in the rolling form window.
    #[arg(long = "window", value_name = "EVENTS")]
    pub window: Option<usize>,

    /// Emit the raw qualifying gap in seconds instead of its z-score.
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,

    /// Exit with status 1 when any record was excluded.
    #[arg(long = "fail-on-issues")]
    pub fail_on_issues: bool,
}

#[derive(Parser)]
pub struct TeamsArgs {
    /// Team alias table (TOML) to list instead of the default one.
    #[arg(long = "teams", value_name = "TOML")]
    pub teams: Option<PathBuf>,
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
