use crate::models::assignee::{AssigneeStats, GithubActivity, RepoActivity, RepoDeveloperStats};
use std::collections::BTreeMap;

/// Merged GitHub activity for one developer across repositories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedActivity {
    pub commits: u64,
    pub prs: u64,
    pub prs_merged: u64,
    pub additions: u64,
    pub deletions: u64,
    pub test_coverage: f64,
}

impl From<&MergedActivity> for GithubActivity {
    fn from(merged: &MergedActivity) -> Self {
        GithubActivity {
            commits: merged.commits,
            prs: merged.prs,
            prs_merged: merged.prs_merged,
            test_coverage: merged.test_coverage,
        }
    }
}

/// Fold one repository's stats into a developer's running totals. Coverage is
/// a merged-PR-weighted average and only moves when the repo reports both.
fn merge_stats(into: &mut MergedActivity, stats: &RepoDeveloperStats) {
    let previous_merged = into.prs_merged;

    into.commits += stats.total_commits;
    into.prs += stats.total_prs;
    into.prs_merged += stats.merged_prs;
    into.additions += stats.additions;
    into.deletions += stats.deletions;

    if stats.merged_prs == 0 || stats.test_coverage <= 0.0 {
        return;
    }
    let total = into.prs_merged as f64;
    into.test_coverage = (into.test_coverage * previous_merged as f64
        + stats.test_coverage * stats.merged_prs as f64)
        / total;
}

/// Merge per-repository stats into one record per username. Repositories are
/// visited in name order; `repo_filter` restricts the merge to one repository.
pub fn merge_repo_activity(
    repos: &[RepoActivity],
    repo_filter: Option<&str>,
) -> BTreeMap<String, MergedActivity> {
    let mut ordered: Vec<&RepoActivity> = repos
        .iter()
        .filter(|r| repo_filter.map_or(true, |wanted| r.repo == wanted))
        .collect();
    ordered.sort_by(|a, b| a.repo.cmp(&b.repo));

    let mut merged: BTreeMap<String, MergedActivity> = BTreeMap::new();
    for repo in ordered {
        for (username, stats) in &repo.developers {
            merge_stats(merged.entry(username.clone()).or_default(), stats);
        }
    }
    merged
}

/// Attach merged activity to roster entries by exact name. Returns how many
/// entries received activity.
pub fn attach_activity(roster: &mut [AssigneeStats], merged: &BTreeMap<String, MergedActivity>) -> usize {
    let mut attached = 0;
    for stats in roster.iter_mut() {
        if let Some(activity) = merged.get(&stats.name) {
            stats.github_activity = Some(GithubActivity::from(activity));
            attached += 1;
        }
    }
    attached
}
