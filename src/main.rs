//! SprintLens CLI - prints sprint analytics for an issue snapshot as JSON.

use chrono::{DateTime, Utc};
use clap::Parser;
use serde::Serialize;
use sprintlens_lib::cli::{Cli, Commands};
use sprintlens_lib::commands::report::run_report;
use sprintlens_lib::commands::settings::ReportSections;
use sprintlens_lib::{Error, Result};
use std::process;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let now = resolve_now(cli.now.as_deref())?;

    let only = |summary, slippage, ratings, failures| ReportSections {
        summary,
        slippage,
        ratings,
        failures,
    };
    let sections = match cli.command {
        Commands::Report { .. } => None,
        Commands::Slippage { .. } => Some(only(false, true, false, false)),
        Commands::Ratings { .. } => Some(only(false, false, true, false)),
        Commands::Failures { .. } => Some(only(false, false, false, true)),
    };

    let report = run_report(cli.command.snapshot(), cli.settings.as_deref(), sections, now)?;

    match &cli.command {
        Commands::Report { .. } => print_json(&report, cli.compact),
        Commands::Slippage { .. } => print_json(&report.slippage, cli.compact),
        Commands::Ratings { .. } => print_json(&report.ratings, cli.compact),
        Commands::Failures { .. } => print_json(&report.failures, cli.compact),
    }
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| Error::InvalidInput(format!("--now must be RFC 3339: {e}"))),
        None => Ok(Utc::now()),
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{rendered}");
    Ok(())
}
