use crate::models::assignee::{AssigneeStats, RepoActivity};
use crate::models::issue::Issue;
use serde::{Deserialize, Serialize};

/// Input document: the issue list plus optional roster and GitHub activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintSnapshot {
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub assignee_stats: Option<Vec<AssigneeStats>>,
    #[serde(default)]
    pub github_activity: Vec<RepoActivity>,
}
