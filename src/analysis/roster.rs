use crate::analysis::dev_time::development_metrics;
use crate::analysis::status::is_complete;
use crate::models::assignee::AssigneeStats;
use crate::models::issue::Issue;
use std::collections::HashMap;

#[derive(Default)]
struct TimingTotals {
    dev_days: f64,
    dev_count: usize,
    qa_days: f64,
    qa_count: usize,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Build per-assignee rollups from the raw issue list. Upstream timing values
/// take precedence; otherwise they are derived from the status history.
pub fn aggregate_assignees(issues: &[Issue]) -> Vec<AssigneeStats> {
    let mut by_name: HashMap<String, (AssigneeStats, TimingTotals)> = HashMap::new();

    for issue in issues {
        let name = issue.assignee_name();
        let (stats, timing) = by_name.entry(name.to_string()).or_insert_with(|| {
            (
                AssigneeStats {
                    name: name.to_string(),
                    ..Default::default()
                },
                TimingTotals::default(),
            )
        });

        stats.total_issues += 1;
        stats.total_story_points += issue.points();
        *stats.status_breakdown.entry(issue.status.clone()).or_insert(0) += 1;

        if is_complete(issue) {
            stats.closed_issues += 1;
        } else {
            stats.open_issues += 1;
        }

        let derived = if issue.development_time_days.is_none() || issue.in_progress_to_qa_days.is_none() {
            Some(development_metrics(&issue.status_history))
        } else {
            None
        };

        let dev_days = positive(issue.development_time_days)
            .or_else(|| derived.and_then(|m| positive(Some(m.development_time_days))));
        if let Some(days) = dev_days {
            timing.dev_days += days;
            timing.dev_count += 1;
        }

        let qa_days = positive(issue.in_progress_to_qa_days)
            .or_else(|| derived.and_then(|m| positive(Some(m.qa_days))));
        if let Some(days) = qa_days {
            timing.qa_days += days;
            timing.qa_count += 1;
        }
    }

    let mut roster: Vec<AssigneeStats> = by_name
        .into_values()
        .map(|(mut stats, timing)| {
            if timing.dev_count > 0 {
                stats.avg_development_time_days = timing.dev_days / timing.dev_count as f64;
            }
            if timing.qa_count > 0 {
                stats.avg_in_progress_to_qa_days = timing.qa_days / timing.qa_count as f64;
            }
            stats
        })
        .collect();

    roster.sort_by(|a, b| {
        b.total_issues
            .cmp(&a.total_issues)
            .then_with(|| a.name.cmp(&b.name))
    });
    roster
}
