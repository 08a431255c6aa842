use crate::models::report::TicketAge;
use chrono::{DateTime, NaiveDate, Utc};

/// Ages beyond ten years are treated as bad data.
pub const MAX_AGE_DAYS: i64 = 3650;

/// Parse tracker timestamps: RFC 3339, Jira's `+0000` offset form, or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Whole days between `created` and `now`. Unparseable dates and ages outside
/// `0..=MAX_AGE_DAYS` report `Unknown`.
pub fn ticket_age(created: Option<&str>, now: DateTime<Utc>) -> TicketAge {
    let Some(created_at) = created.and_then(parse_timestamp) else {
        return TicketAge::Unknown;
    };

    let days = now.signed_duration_since(created_at).num_days();
    if (0..=MAX_AGE_DAYS).contains(&days) {
        TicketAge::Days(days)
    } else {
        TicketAge::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2025-03-20T12:00:00Z").unwrap()
    }

    #[test]
    fn parses_jira_offset_format() {
        let parsed = parse_timestamp("2025-03-10T09:15:00.000+0000").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-10T09:15:00+00:00");
    }

    #[test]
    fn computes_whole_days() {
        assert_eq!(ticket_age(Some("2025-03-10T18:00:00Z"), now()), TicketAge::Days(9));
        assert_eq!(ticket_age(Some("2025-03-20"), now()), TicketAge::Days(0));
    }

    #[test]
    fn malformed_or_missing_dates_are_unknown() {
        assert_eq!(ticket_age(Some("last tuesday"), now()), TicketAge::Unknown);
        assert_eq!(ticket_age(Some(""), now()), TicketAge::Unknown);
        assert_eq!(ticket_age(None, now()), TicketAge::Unknown);
    }

    #[test]
    fn out_of_range_ages_are_unknown() {
        assert_eq!(ticket_age(Some("2025-04-01"), now()), TicketAge::Unknown);
        assert_eq!(ticket_age(Some("1970-01-01"), now()), TicketAge::Unknown);
    }
}
