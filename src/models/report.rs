use crate::models::assignee::FailureProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Healthy,
}

/// Age of a ticket in whole days, or `Unknown` when the creation date is
/// unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketAge {
    Days(i64),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippedTicket {
    pub key: String,
    pub summary: String,
    pub assignee: String,
    pub story_points: f64,
    pub status: String,
    pub priority: String,
    pub created: Option<String>,
    pub age: TicketAge,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeSlippage {
    pub assignee: String,
    pub ticket_count: usize,
    pub story_points: f64,
    pub tickets: Vec<SlippedTicket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlippageReport {
    pub committed_points: f64,
    pub completed_points: f64,
    pub slipped_points: f64,
    pub slippage_percentage: f64,
    pub severity: Severity,
    pub slipped_tickets: Vec<SlippedTicket>,
    pub by_assignee: Vec<AssigneeSlippage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    pub factor: String,
    pub score: f64,
    pub weight: f64,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperRating {
    pub stars: u8,
    pub percentage: f64,
    pub breakdown: Vec<String>,
    pub factors: Vec<FactorScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDeveloper {
    pub rank: usize,
    pub name: String,
    pub total_story_points: f64,
    pub failures: FailureProfile,
    pub rating: DeveloperRating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSummary {
    pub total_issues: usize,
    pub open_issues: usize,
    pub in_progress_issues: usize,
    pub closed_issues: usize,
    pub avg_development_time_days: f64,
    pub total_story_points: f64,
    pub open_story_points: f64,
    pub in_progress_story_points: f64,
    pub closed_story_points: f64,
    pub velocity: f64,
    pub status_breakdown: BTreeMap<String, usize>,
    pub priority_breakdown: BTreeMap<String, usize>,
    pub type_breakdown: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintReport {
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SprintSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage: Option<SlippageReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<Vec<RankedDeveloper>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<BTreeMap<String, FailureProfile>>,
    pub collapsed_assignees: Vec<String>,
}
