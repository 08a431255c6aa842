use crate::analysis::activity::{attach_activity, merge_repo_activity};
use crate::analysis::rating::{rank_developers, RatingProfile};
use crate::analysis::roster::aggregate_assignees;
use crate::analysis::slippage::compute_slippage;
use crate::analysis::status::failure_profiles;
use crate::analysis::summary::summarize;
use crate::commands::settings::{load_effective_settings, EffectiveSettings, ReportSections};
use crate::commands::snapshot::load_snapshot;
use crate::models::assignee::AssigneeStats;
use crate::models::report::{SprintReport, TicketAge};
use crate::models::snapshot::SprintSnapshot;
use crate::Result;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::path::Path;

/// Load a snapshot (and optional settings file) and build the report.
/// `sections`, when given, replaces the sections chosen by the settings.
pub fn run_report(
    snapshot_path: &Path,
    settings_path: Option<&Path>,
    sections: Option<ReportSections>,
    now: DateTime<Utc>,
) -> Result<SprintReport> {
    let mut settings = match settings_path {
        Some(path) => load_effective_settings(path)?,
        None => EffectiveSettings::default(),
    };
    if let Some(sections) = sections {
        settings.sections = sections;
    }
    let snapshot = load_snapshot(snapshot_path)?;
    Ok(build_report(&snapshot, &settings, now))
}

/// Resolve the roster the rating engine scores: the supplied roster when
/// present, otherwise one aggregated from the issues. GitHub activity is
/// merged in or stripped according to the settings.
pub fn resolve_roster(snapshot: &SprintSnapshot, settings: &EffectiveSettings) -> Vec<AssigneeStats> {
    let mut roster = match &snapshot.assignee_stats {
        Some(roster) => roster.clone(),
        None => aggregate_assignees(&snapshot.issues),
    };

    if !settings.include_github_activity {
        for stats in roster.iter_mut() {
            stats.github_activity = None;
        }
        return roster;
    }

    if !snapshot.github_activity.is_empty() {
        let merged = merge_repo_activity(&snapshot.github_activity, settings.github_repo_filter.as_deref());
        let attached = attach_activity(&mut roster, &merged);
        debug!(
            "merged GitHub activity for {} developers, attached to {attached} roster entries",
            merged.len()
        );
        if attached == 0 && !merged.is_empty() {
            warn!("GitHub activity present but no usernames matched roster names");
        }
    }

    roster
}

/// Recompute every requested section from the snapshot. Pure apart from logging.
pub fn build_report(snapshot: &SprintSnapshot, settings: &EffectiveSettings, now: DateTime<Utc>) -> SprintReport {
    let issues = &snapshot.issues;
    let sections = settings.sections;

    let summary = sections.summary.then(|| summarize(issues));

    let slippage = sections.slippage.then(|| {
        let mut report = compute_slippage(issues, now);
        let unknown_ages = report
            .slipped_tickets
            .iter()
            .filter(|t| t.age == TicketAge::Unknown)
            .count();
        if unknown_ages > 0 {
            warn!("{unknown_ages} slipped tickets have an unusable created date");
        }
        if settings.slipped_ticket_limit > 0 {
            report.slipped_tickets.truncate(settings.slipped_ticket_limit);
        }
        debug!(
            "slippage: committed {:.1}, completed {:.1}, {:.2}%",
            report.committed_points, report.completed_points, report.slippage_percentage
        );
        report
    });

    let needs_failures = sections.failures || sections.ratings;
    let failures = if needs_failures {
        failure_profiles(issues)
    } else {
        Default::default()
    };

    let ratings = sections.ratings.then(|| {
        let roster = resolve_roster(snapshot, settings);
        let profile = if settings.include_github_activity {
            RatingProfile::detect(&roster)
        } else {
            RatingProfile::WithoutGithub
        };
        debug!("rating {} developers with {profile:?} weights", roster.len());
        rank_developers(&roster, &failures, profile)
    });

    SprintReport {
        generated_at: now.to_rfc3339(),
        summary,
        slippage,
        ratings,
        failures: sections.failures.then_some(failures),
        collapsed_assignees: settings.collapsed_assignees.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::status::tests::issue;
    use crate::models::assignee::{GithubActivity, RepoActivity, RepoDeveloperStats};

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-20T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn snapshot() -> SprintSnapshot {
        let mut done = issue(
            "P-1",
            "Done",
            &[
                ("To Do", "In Progress"),
                ("In Progress", "Failed"),
                ("Failed", "In Progress"),
                ("In Progress", "Done"),
            ],
        );
        done.story_points = Some(5.0);
        done.assignee = Some("alice".to_string());

        let mut slipping = issue("P-2", "In Progress", &[("To Do", "In Progress")]);
        slipping.story_points = Some(8.0);
        slipping.assignee = Some("bob".to_string());

        let mut also_slipping = issue("P-3", "QA Review", &[]);
        also_slipping.story_points = Some(3.0);
        also_slipping.assignee = Some("alice".to_string());

        let backlog = issue("P-4", "To Do", &[]);

        SprintSnapshot {
            issues: vec![done, slipping, also_slipping, backlog],
            ..Default::default()
        }
    }

    #[test]
    fn builds_every_section_by_default() {
        let report = build_report(&snapshot(), &EffectiveSettings::default(), now());

        let slippage = report.slippage.unwrap();
        assert_eq!(slippage.committed_points, 16.0);
        assert_eq!(slippage.slipped_points, 11.0);
        assert_eq!(slippage.slippage_percentage, 68.75);

        let failures = report.failures.unwrap();
        assert_eq!(failures["alice"].ticket_fails, 1);
        assert_eq!(failures["alice"].ticket_unfailed, 1);

        let ratings = report.ratings.unwrap();
        assert_eq!(ratings.len(), 3);
        assert!(ratings.iter().all(|r| (1..=5).contains(&r.rating.stars)));
        assert_eq!(report.summary.unwrap().total_issues, 4);
        assert_eq!(report.generated_at, "2025-03-20T00:00:00+00:00");
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let settings = EffectiveSettings::default();
        let first = build_report(&snapshot(), &settings, now());
        let second = build_report(&snapshot(), &settings, now());
        assert_eq!(first, second);
    }

    #[test]
    fn respects_sections_and_ticket_limit() {
        let settings = EffectiveSettings {
            slipped_ticket_limit: 1,
            sections: ReportSections {
                summary: false,
                slippage: true,
                ratings: false,
                failures: false,
            },
            ..Default::default()
        };

        let report = build_report(&snapshot(), &settings, now());
        assert!(report.summary.is_none());
        assert!(report.ratings.is_none());
        assert!(report.failures.is_none());
        let slippage = report.slippage.unwrap();
        assert_eq!(slippage.slipped_tickets.len(), 1);
        assert_eq!(slippage.slipped_tickets[0].key, "P-2");
        assert_eq!(slippage.slipped_points, 11.0);
    }

    #[test]
    fn github_activity_switches_profile_unless_disabled() {
        let mut snap = snapshot();
        snap.github_activity = vec![RepoActivity {
            repo: "web".to_string(),
            developers: [(
                "alice".to_string(),
                RepoDeveloperStats {
                    total_commits: 12,
                    merged_prs: 2,
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
        }];

        let with = build_report(&snap, &EffectiveSettings::default(), now());
        let alice = with
            .ratings
            .unwrap()
            .into_iter()
            .find(|r| r.name == "alice")
            .unwrap();
        assert_eq!(alice.rating.factors.len(), 7);

        let settings = EffectiveSettings {
            include_github_activity: false,
            ..Default::default()
        };
        let roster = resolve_roster(&snap, &settings);
        assert!(roster.iter().all(|s| s.github_activity.is_none()));
        let without = build_report(&snap, &settings, now());
        assert!(without
            .ratings
            .unwrap()
            .iter()
            .all(|r| r.rating.factors.len() == 5));
    }

    #[test]
    fn supplied_roster_is_used_verbatim() {
        let mut snap = snapshot();
        snap.assignee_stats = Some(vec![AssigneeStats {
            name: "dana".to_string(),
            total_issues: 3,
            closed_issues: 3,
            total_story_points: 9.0,
            github_activity: Some(GithubActivity::default()),
            ..Default::default()
        }]);

        let roster = resolve_roster(&snap, &EffectiveSettings::default());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "dana");
    }
}
