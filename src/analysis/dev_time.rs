use crate::analysis::age::parse_timestamp;
use crate::models::issue::StatusTransition;
use chrono::{DateTime, Utc};

const QA_STATUSES: &[&str] = &["QA Review", "QA", "Testing", "Ready for QA", "In Testing"];
const TODO_STATUSES: &[&str] = &["To Do", "ToDo"];
const FALLBACK_START_STATUSES: &[&str] = &["Open", "Backlog"];
const CODE_REVIEW_STATUSES: &[&str] = &["Code Review", "In Review", "Review"];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DevelopmentMetrics {
    pub qa_days: f64,
    pub development_time_days: f64,
}

fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 86_400.0
}

/// Derive time spent in QA and overall development time from a status history.
///
/// Development runs from the first To Do (or Open/Backlog when there is none)
/// to whichever is later of the last code review and the last QA entry.
pub fn development_metrics(history: &[StatusTransition]) -> DevelopmentMetrics {
    let mut qa_days = 0.0;
    let mut qa_enter: Option<DateTime<Utc>> = None;
    let mut last_qa: Option<DateTime<Utc>> = None;
    let mut todo_at: Option<DateTime<Utc>> = None;
    let mut fallback_start: Option<DateTime<Utc>> = None;
    let mut code_review_at: Option<DateTime<Utc>> = None;

    for entry in history {
        let Some(at) = parse_timestamp(&entry.timestamp) else {
            continue;
        };
        let status = entry.status.as_str();

        if todo_at.is_none() && TODO_STATUSES.contains(&status) {
            todo_at = Some(at);
        }
        if fallback_start.is_none() && FALLBACK_START_STATUSES.contains(&status) {
            fallback_start = Some(at);
        }
        if CODE_REVIEW_STATUSES.contains(&status) {
            code_review_at = Some(at);
        }

        if QA_STATUSES.contains(&status) {
            qa_enter.get_or_insert(at);
            last_qa = Some(at);
        } else if let Some(entered) = qa_enter.take() {
            qa_days += days_between(entered, at);
        }
    }

    // Still in QA: close the open session at the last QA entry.
    if let (Some(entered), Some(last)) = (qa_enter, last_qa) {
        qa_days += days_between(entered, last);
    }

    let start = todo_at.or(fallback_start);
    let end = match (code_review_at, last_qa) {
        (Some(review), Some(qa)) => Some(review.max(qa)),
        (review, qa) => review.or(qa),
    };

    let development_time_days = match (start, end) {
        (Some(start), Some(end)) if end > start => days_between(start, end),
        _ => 0.0,
    };

    DevelopmentMetrics {
        qa_days,
        development_time_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(status: &str, timestamp: &str) -> StatusTransition {
        StatusTransition {
            status: status.to_string(),
            from_status: None,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn empty_history_yields_zero() {
        assert_eq!(development_metrics(&[]), DevelopmentMetrics::default());
    }

    #[test]
    fn measures_todo_to_last_review() {
        let history = vec![
            at("To Do", "2025-03-01T00:00:00Z"),
            at("In Progress", "2025-03-02T00:00:00Z"),
            at("Code Review", "2025-03-04T00:00:00Z"),
            at("QA Review", "2025-03-05T00:00:00Z"),
            at("Done", "2025-03-06T12:00:00Z"),
        ];

        let metrics = development_metrics(&history);
        assert_eq!(metrics.development_time_days, 4.0);
        assert_eq!(metrics.qa_days, 1.5);
    }

    #[test]
    fn accumulates_multiple_qa_sessions_and_open_session() {
        let history = vec![
            at("Backlog", "2025-03-01T00:00:00Z"),
            at("Testing", "2025-03-02T00:00:00Z"),
            at("Failed", "2025-03-03T00:00:00Z"),
            at("QA", "2025-03-04T00:00:00Z"),
            at("Ready for QA", "2025-03-05T00:00:00Z"),
        ];

        let metrics = development_metrics(&history);
        assert_eq!(metrics.qa_days, 2.0);
        // Falls back to Backlog as the start.
        assert_eq!(metrics.development_time_days, 4.0);
    }

    #[test]
    fn unparseable_timestamps_are_ignored() {
        let history = vec![
            at("To Do", "not a date"),
            at("Code Review", "2025-03-04T00:00:00Z"),
        ];

        assert_eq!(development_metrics(&history).development_time_days, 0.0);
    }
}
