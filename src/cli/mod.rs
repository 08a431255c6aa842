//! CLI argument definitions for SprintLens.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sprintlens")]
#[command(author, version, about = "Sprint slippage and developer rating analytics", long_about = None)]
pub struct Cli {
    /// Settings file (JSON). Defaults apply when omitted or missing.
    #[arg(short = 's', long = "settings", global = true, env = "SPRINTLENS_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Reference time for ticket ages (RFC 3339). Defaults to now.
    #[arg(long = "now", global = true)]
    pub now: Option<String>,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full report: summary, slippage, ratings and failure profiles
    Report {
        /// Snapshot file: an object with `issues` or a bare issue array
        snapshot: PathBuf,
    },

    /// Sprint slippage only
    Slippage { snapshot: PathBuf },

    /// Ranked developer ratings only
    Ratings { snapshot: PathBuf },

    /// Per-assignee failure / recovery counts only
    Failures { snapshot: PathBuf },
}

impl Commands {
    pub fn snapshot(&self) -> &PathBuf {
        match self {
            Commands::Report { snapshot }
            | Commands::Slippage { snapshot }
            | Commands::Ratings { snapshot }
            | Commands::Failures { snapshot } => snapshot,
        }
    }
}
