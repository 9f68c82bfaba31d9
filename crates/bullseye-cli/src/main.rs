//! Bullseye match scoring CLI.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use bullseye_cli::commands::{
    ReportRequest, ScoreRequest, run_averages, run_matches, run_report, run_score, run_shooters,
};
use bullseye_cli::logging::{LogConfig, LogFormat, init_logging};
use bullseye_cli::summary::{
    averages_table, catalog_table, match_type_averages_table, matches_table, report_table,
    shooters_table,
};
use bullseye_report::{MatchReport, NO_DATA, ReportOptions, write_report_json};
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ReportArgs, ScoreArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let data = cli.data.as_path();
    match &cli.command {
        Command::Catalog => println!("{}", catalog_table()),
        Command::Report(args) => {
            let outcome = run_report(data, &report_request(args))?;
            if args.json {
                println!("{}", report_json(&outcome.report)?);
            } else {
                println!("{}", outcome.table.title);
                println!("{}", report_table(&outcome.table));
            }
            for path in &outcome.written {
                eprintln!("wrote {}", path.display());
            }
        }
        Command::Score(args) => {
            let record = run_score(data, &score_request(args))?;
            let total = record
                .total_score
                .map_or_else(|| "Not Shot".to_string(), |t| t.to_string());
            let x_count = record
                .total_x_count
                .map_or_else(|| NO_DATA.to_string(), |x| x.to_string());
            println!("{} {}: {total} ({x_count}X)", record.match_type_instance, record.caliber);
        }
        Command::Averages { shooter_id } => {
            let (shooter, averages) = run_averages(data, shooter_id)?;
            println!("{}", shooter.name);
            if averages.is_empty() {
                println!("No scores recorded.");
            } else {
                println!("{}", averages_table(&averages));
                println!("{}", match_type_averages_table(&averages));
            }
        }
        Command::Matches => println!("{}", matches_table(&run_matches(data)?)),
        Command::Shooters => println!("{}", shooters_table(&run_shooters(data)?)),
    }
    Ok(())
}

fn report_json(report: &MatchReport) -> Result<String> {
    let mut buffer = Vec::new();
    write_report_json(report, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn report_request(args: &ReportArgs) -> ReportRequest {
    ReportRequest {
        match_id: args.match_id.clone(),
        xlsx: args.xlsx.clone(),
        csv: args.csv.clone(),
        options: ReportOptions {
            sheet_name_limit: args.sheet_name_limit,
            detail_sheets: !args.no_detail_sheets,
        },
    }
}

fn score_request(args: &ScoreArgs) -> ScoreRequest {
    ScoreRequest {
        match_id: args.match_id.clone(),
        shooter_id: args.shooter_id.clone(),
        instance: args.instance.clone(),
        caliber: args.caliber.clone(),
        stages: args.stages.clone(),
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
