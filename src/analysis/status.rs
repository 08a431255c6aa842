use crate::models::assignee::FailureProfile;
use crate::models::issue::{Issue, StatusTransition};
use std::collections::BTreeMap;

/// Lowercase markers matched as substrings of a status name.
pub const IN_PROGRESS_MARKERS: &[&str] = &["in progress", "code review", "qa review", "testing", "review"];

/// Lowercase status names matched exactly (after case folding).
pub const COMPLETE_STATUSES: &[&str] = &[
    "done",
    "closed",
    "resolved",
    "complete",
    "completed",
    "schedule release",
    "scheduled release",
    "production release",
    "prod release",
    "release",
];

/// Failure spellings, matched case-sensitively.
pub const FAILED_STATUSES: &[&str] = &["Failed", "failed", "FAILED", "QA Failed", "Failed QA"];

fn has_in_progress_marker(status: &str) -> bool {
    let lower = status.to_lowercase();
    IN_PROGRESS_MARKERS.iter().any(|marker| lower.contains(marker))
}

pub fn is_failed_status(status: &str) -> bool {
    FAILED_STATUSES.contains(&status)
}

/// True when the current status or any historical status looks like active work.
pub fn was_ever_started(issue: &Issue) -> bool {
    has_in_progress_marker(&issue.status)
        || issue
            .status_history
            .iter()
            .any(|entry| has_in_progress_marker(&entry.status))
}

/// True when the current status is one of the completion statuses.
pub fn is_complete(issue: &Issue) -> bool {
    let lower = issue.status.to_lowercase();
    COMPLETE_STATUSES.contains(&lower.as_str())
}

/// Failure outcome of a single issue's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailureOutcome {
    pub failure_count: usize,
    pub recovered: bool,
}

impl FailureOutcome {
    pub fn failed(&self) -> bool {
        self.failure_count > 0
    }
}

pub fn failure_outcome(history: &[StatusTransition]) -> FailureOutcome {
    let failure_count = history.iter().filter(|t| is_failed_status(&t.status)).count();
    let recovered = history
        .windows(2)
        .any(|pair| is_failed_status(&pair[0].status) && !is_failed_status(&pair[1].status));

    FailureOutcome {
        failure_count,
        recovered,
    }
}

/// Failure profile of one issue: each flag counts at most once per issue.
pub fn issue_failure_profile(issue: &Issue) -> FailureProfile {
    let outcome = failure_outcome(&issue.status_history);
    FailureProfile {
        ticket_fails: u32::from(outcome.failed()),
        ticket_unfailed: u32::from(outcome.failed() && outcome.recovered),
    }
}

/// Sum per-issue failure profiles for every assignee in the snapshot.
pub fn failure_profiles(issues: &[Issue]) -> BTreeMap<String, FailureProfile> {
    let mut profiles: BTreeMap<String, FailureProfile> = BTreeMap::new();
    for issue in issues {
        let issue_profile = issue_failure_profile(issue);
        let entry = profiles.entry(issue.assignee_name().to_string()).or_default();
        entry.ticket_fails += issue_profile.ticket_fails;
        entry.ticket_unfailed += issue_profile.ticket_unfailed;
    }
    profiles
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn transition(from: Option<&str>, to: &str) -> StatusTransition {
        StatusTransition {
            status: to.to_string(),
            from_status: from.map(str::to_string),
            timestamp: String::new(),
        }
    }

    pub(crate) fn issue(key: &str, status: &str, history: &[(&str, &str)]) -> Issue {
        Issue {
            key: key.to_string(),
            summary: format!("{key} summary"),
            status: status.to_string(),
            status_history: history
                .iter()
                .map(|&(from, to)| transition(Some(from), to))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn fail_then_recover_history_is_classified() {
        let issue = issue(
            "P-1",
            "Done",
            &[
                ("To Do", "In Progress"),
                ("In Progress", "Failed"),
                ("Failed", "In Progress"),
                ("In Progress", "Done"),
            ],
        );

        assert!(was_ever_started(&issue));
        assert!(is_complete(&issue));
        assert_eq!(
            issue_failure_profile(&issue),
            FailureProfile {
                ticket_fails: 1,
                ticket_unfailed: 1
            }
        );
    }

    #[test]
    fn empty_history_never_started_unless_current_status_matches() {
        let todo = issue("P-2", "To Do", &[]);
        assert!(!was_ever_started(&todo));
        assert_eq!(issue_failure_profile(&todo), FailureProfile::default());

        let reviewing = issue("P-3", "Code Review Pending", &[]);
        assert!(was_ever_started(&reviewing));
    }

    #[test]
    fn started_markers_are_case_insensitive_substrings() {
        let issue = issue("P-4", "Backlog", &[("Backlog", "QA REVIEW")]);
        assert!(was_ever_started(&issue));
    }

    #[test]
    fn completion_requires_exact_status() {
        assert!(is_complete(&issue("P-5", "PROD RELEASE", &[])));
        assert!(!is_complete(&issue("P-6", "Done-ish", &[])));
        assert!(!is_complete(&issue("P-7", "Ready for Release", &[])));
    }

    #[test]
    fn failure_spellings_are_case_sensitive() {
        assert!(is_failed_status("QA Failed"));
        assert!(!is_failed_status("Qa Failed"));
        assert!(!is_failed_status("failed qa"));
    }

    #[test]
    fn repeated_failures_count_once_per_issue() {
        let issue = issue(
            "P-8",
            "Failed",
            &[("In Progress", "Failed"), ("Failed", "FAILED")],
        );
        let outcome = failure_outcome(&issue.status_history);
        assert_eq!(outcome.failure_count, 2);
        assert!(!outcome.recovered);
        assert_eq!(
            issue_failure_profile(&issue),
            FailureProfile {
                ticket_fails: 1,
                ticket_unfailed: 0
            }
        );
    }

    #[test]
    fn profiles_are_summed_per_assignee() {
        let mut a = issue("P-9", "Done", &[("In Progress", "Failed"), ("Failed", "Done")]);
        a.assignee = Some("alice".to_string());
        let mut b = issue("P-10", "Failed", &[("In Progress", "Failed")]);
        b.assignee = Some("alice".to_string());
        let c = issue("P-11", "Done", &[]);

        let profiles = failure_profiles(&[a, b, c]);
        assert_eq!(
            profiles["alice"],
            FailureProfile {
                ticket_fails: 2,
                ticket_unfailed: 1
            }
        );
        assert_eq!(profiles["Unassigned"], FailureProfile::default());
    }
}
