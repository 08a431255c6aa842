use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubActivity {
    pub commits: u64,
    pub prs: u64,
    pub prs_merged: u64,
    pub test_coverage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeStats {
    pub name: String,
    #[serde(default)]
    pub total_issues: u32,
    #[serde(default)]
    pub open_issues: u32,
    #[serde(default)]
    pub closed_issues: u32,
    #[serde(default)]
    pub total_story_points: f64,
    #[serde(default)]
    pub avg_development_time_days: f64,
    #[serde(default, rename = "avgInProgressToQADays")]
    pub avg_in_progress_to_qa_days: f64,
    #[serde(default)]
    pub status_breakdown: BTreeMap<String, u32>,
    #[serde(default)]
    pub github_activity: Option<GithubActivity>,
}

/// Per-repository developer stats as reported by the GitHub supplier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoDeveloperStats {
    pub total_commits: u64,
    pub total_prs: u64,
    pub merged_prs: u64,
    pub additions: u64,
    pub deletions: u64,
    pub test_coverage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoActivity {
    pub repo: String,
    #[serde(default)]
    pub developers: BTreeMap<String, RepoDeveloperStats>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureProfile {
    pub ticket_fails: u32,
    pub ticket_unfailed: u32,
}
