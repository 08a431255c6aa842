use crate::models::issue::Issue;
use crate::models::report::SprintSummary;

const CLOSED_STATUSES: &[&str] = &[
    "Schedule Release",
    "Scheduled Release",
    "Production Release",
    "Done",
    "Closed",
    "Resolved",
];

const ACTIVE_STATUSES: &[&str] = &["To Do", "ToDo", "In Progress", "Failed", "Code Review", "QA Review"];

const VELOCITY_STATUSES: &[&str] = &["Done", "Closed", "Resolved"];

/// Snapshot-wide counts, story point totals and breakdowns.
pub fn summarize(issues: &[Issue]) -> SprintSummary {
    let mut summary = SprintSummary {
        total_issues: issues.len(),
        ..Default::default()
    };
    let mut dev_days = 0.0;
    let mut dev_count = 0usize;

    for issue in issues {
        let points = issue.points();
        let status = issue.status.as_str();
        summary.total_story_points += points;

        if CLOSED_STATUSES.contains(&status) {
            summary.closed_issues += 1;
            summary.closed_story_points += points;
        } else {
            summary.open_issues += 1;
            summary.open_story_points += points;
        }

        if ACTIVE_STATUSES.contains(&status) {
            summary.in_progress_issues += 1;
            summary.in_progress_story_points += points;
        }

        if VELOCITY_STATUSES.contains(&status) {
            summary.velocity += points;
        }

        if let Some(days) = issue.development_time_days.filter(|d| d.is_finite() && *d > 0.0) {
            dev_days += days;
            dev_count += 1;
        }

        *summary.status_breakdown.entry(issue.status.clone()).or_insert(0) += 1;
        *summary.priority_breakdown.entry(issue.priority.clone()).or_insert(0) += 1;
        *summary.type_breakdown.entry(issue.issue_type.clone()).or_insert(0) += 1;
    }

    if dev_count > 0 {
        summary.avg_development_time_days = dev_days / dev_count as f64;
    }

    summary
}
