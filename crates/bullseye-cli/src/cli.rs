//! CLI argument definitions for the bullseye scorer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bullseye",
    version,
    about = "Bullseye pistol match scoring",
    long_about = "Score bullseye pistol matches.\n\n\
                  Records stage scores, builds match reports with 1800/2700 aggregates,\n\
                  and tracks per-shooter averages across matches."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON data file holding matches, shooters and scores.
    #[arg(
        long = "data",
        value_name = "FILE",
        default_value = "bullseye.json",
        global = true
    )]
    pub data: PathBuf,

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
    /// Show the stage layout of every match type.
    Catalog,

    /// Build the report for one match.
    Report(ReportArgs),

    /// Record or replace one shooter's score for a match slot.
    Score(ScoreArgs),

    /// Show a shooter's averages across all matches.
    Averages {
        #[arg(value_name = "SHOOTER_ID")]
        shooter_id: String,
    },

    /// List stored matches.
    Matches,

    /// List stored shooters.
    Shooters,
}

#[derive(Parser)]
pub struct ReportArgs {
    #[arg(value_name = "MATCH_ID")]
    pub match_id: String,

    /// Write the report workbook to this path.
    #[arg(long = "xlsx", value_name = "PATH")]
    pub xlsx: Option<PathBuf>,

    /// Write the report table as CSV to this path.
    #[arg(long = "csv", value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Print the report payload as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Only write the summary sheet to the workbook.
    #[arg(long = "no-detail-sheets")]
    pub no_detail_sheets: bool,

    /// Cut detail sheet names to this many characters.
    #[arg(long = "sheet-name-limit", value_name = "N", default_value_t = 28)]
    pub sheet_name_limit: usize,
}

#[derive(Parser)]
pub struct ScoreArgs {
    #[arg(value_name = "MATCH_ID")]
    pub match_id: String,

    #[arg(value_name = "SHOOTER_ID")]
    pub shooter_id: String,

    /// Match-type instance name, e.g. "900 A".
    #[arg(value_name = "INSTANCE")]
    pub instance: String,

    #[arg(value_name = "CALIBER")]
    pub caliber: String,

    /// Stage result as NAME=SCORE[:X], repeatable. Omitted stages stay blank.
    #[arg(long = "stage", value_name = "NAME=SCORE[:X]")]
    pub stages: Vec<String>,
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
