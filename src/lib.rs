//! SprintLens - developer performance and sprint-health analytics.
//!
//! Turns an issue-tracker snapshot (issues with status-transition histories,
//! plus an optional assignee roster and GitHub activity) into a slippage
//! report, failure/recovery profiles and a ranked 1-5 star developer rating.
//! All calculators in [`analysis`] are pure; [`commands`] handles loading
//! snapshots and settings from disk.

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod models;

/// Library-level error type. Only loading and saving can fail; data-quality
/// problems inside a snapshot are absorbed by the calculators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
