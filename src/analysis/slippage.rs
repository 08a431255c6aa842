use crate::analysis::age::ticket_age;
use crate::analysis::status::{is_complete, was_ever_started};
use crate::models::issue::Issue;
use crate::models::report::{AssigneeSlippage, Severity, SlippageReport, SlippedTicket};
use chrono::{DateTime, Utc};

pub const HIGH_RISK_THRESHOLD: f64 = 20.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 10.0;

/// Priority rank used as the slipped-ticket tie-break. Unknown priorities rank 0.
pub fn priority_rank(priority: &str) -> u8 {
    match priority {
        "Highest" => 5,
        "High" => 4,
        "Medium" => 3,
        "Low" => 2,
        "Lowest" => 1,
        _ => 0,
    }
}

/// Severity band for a slippage percentage:
/// - above 20% is high risk
/// - 10% to 20% inclusive is medium
/// - below 10% is healthy
pub fn severity(slippage_percentage: f64) -> Severity {
    if slippage_percentage > HIGH_RISK_THRESHOLD {
        Severity::High
    } else if slippage_percentage >= MEDIUM_RISK_THRESHOLD {
        Severity::Medium
    } else {
        Severity::Healthy
    }
}

/// Compute committed, completed and slipped story points for the snapshot.
/// Issues that never entered an in-progress status are ignored entirely.
pub fn compute_slippage(issues: &[Issue], now: DateTime<Utc>) -> SlippageReport {
    let mut committed_points = 0.0;
    let mut completed_points = 0.0;
    let mut slipped_tickets = Vec::new();

    for issue in issues {
        if !was_ever_started(issue) {
            continue;
        }

        let points = issue.points();
        committed_points += points;

        if is_complete(issue) {
            completed_points += points;
        } else {
            slipped_tickets.push(SlippedTicket {
                key: issue.key.clone(),
                summary: issue.summary.clone(),
                assignee: issue.assignee_name().to_string(),
                story_points: points,
                status: issue.status.clone(),
                priority: issue.priority.clone(),
                created: issue.created.clone(),
                age: ticket_age(issue.created.as_deref(), now),
            });
        }
    }

    sort_slipped_tickets(&mut slipped_tickets);

    let slipped_points = committed_points - completed_points;
    let slippage_percentage = if committed_points > 0.0 {
        slipped_points / committed_points * 100.0
    } else {
        0.0
    };

    SlippageReport {
        committed_points,
        completed_points,
        slipped_points,
        slippage_percentage,
        severity: severity(slippage_percentage),
        by_assignee: group_by_assignee(&slipped_tickets),
        slipped_tickets,
    }
}

/// Story points descending, then priority rank descending. Stable.
pub fn sort_slipped_tickets(tickets: &mut [SlippedTicket]) {
    tickets.sort_by(|a, b| {
        b.story_points
            .total_cmp(&a.story_points)
            .then_with(|| priority_rank(&b.priority).cmp(&priority_rank(&a.priority)))
    });
}

/// Group tickets by assignee, largest groups first. Groups of equal size keep
/// the order in which their first ticket appears.
pub fn group_by_assignee(tickets: &[SlippedTicket]) -> Vec<AssigneeSlippage> {
    let mut groups: Vec<AssigneeSlippage> = Vec::new();

    for ticket in tickets {
        match groups.iter_mut().find(|g| g.assignee == ticket.assignee) {
            Some(group) => {
                group.ticket_count += 1;
                group.story_points += ticket.story_points;
                group.tickets.push(ticket.clone());
            }
            None => groups.push(AssigneeSlippage {
                assignee: ticket.assignee.clone(),
                ticket_count: 1,
                story_points: ticket.story_points,
                tickets: vec![ticket.clone()],
            }),
        }
    }

    groups.sort_by(|a, b| b.ticket_count.cmp(&a.ticket_count));
    groups
}
