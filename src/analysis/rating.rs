use crate::models::assignee::{AssigneeStats, FailureProfile};
use crate::models::report::{DeveloperRating, FactorScore, RankedDeveloper};
use std::collections::BTreeMap;

/// Which weight table applies. Chosen once per computation: the GitHub table
/// is used when any roster entry carries GitHub activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingProfile {
    WithGithub,
    WithoutGithub,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorWeights {
    pub story_points: f64,
    pub completion: f64,
    pub dev_time: f64,
    pub commits: f64,
    pub merged_prs: f64,
    pub quality: f64,
    pub recovery: f64,
}

impl RatingProfile {
    pub fn detect(roster: &[AssigneeStats]) -> Self {
        if roster.iter().any(|s| s.github_activity.is_some()) {
            RatingProfile::WithGithub
        } else {
            RatingProfile::WithoutGithub
        }
    }

    pub fn weights(self) -> FactorWeights {
        match self {
            RatingProfile::WithoutGithub => FactorWeights {
                story_points: 30.0,
                completion: 25.0,
                dev_time: 20.0,
                commits: 0.0,
                merged_prs: 0.0,
                quality: 15.0,
                recovery: 10.0,
            },
            RatingProfile::WithGithub => FactorWeights {
                story_points: 25.0,
                completion: 20.0,
                dev_time: 15.0,
                commits: 15.0,
                merged_prs: 15.0,
                quality: 5.0,
                recovery: 5.0,
            },
        }
    }
}

/// Team-wide reference values for the relative factors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamAverages {
    pub story_points: f64,
    pub dev_time_days: f64,
    pub commits: f64,
    pub merged_prs: f64,
}

impl TeamAverages {
    pub fn from_roster(roster: &[AssigneeStats]) -> Self {
        let story_points = mean(roster.iter().map(|s| s.total_story_points));
        let dev_time_days = mean(
            roster
                .iter()
                .map(|s| s.avg_development_time_days)
                .filter(|d| *d > 0.0),
        );
        let activity: Vec<_> = roster.iter().filter_map(|s| s.github_activity.as_ref()).collect();
        let commits = mean(activity.iter().map(|a| a.commits as f64));
        let merged_prs = mean(activity.iter().map(|a| a.prs_merged as f64));

        TeamAverages {
            story_points,
            dev_time_days,
            commits,
            merged_prs,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Higher-is-better factor: full weight at twice the team average.
fn relative_score(value: f64, team_average: f64, weight: f64) -> f64 {
    if team_average <= 0.0 {
        return 0.0;
    }
    (value / (team_average * 2.0)).min(1.0) * weight
}

/// Lower-is-better factor: full weight up to the team average, then a linear
/// penalty reaching zero at twice the average.
fn dev_time_score(days: f64, team_average: f64, weight: f64) -> f64 {
    if days <= 0.0 || team_average <= 0.0 || days <= team_average {
        return weight;
    }
    let overrun = (days - team_average) / team_average;
    (1.0 - overrun).max(0.0) * weight
}

pub fn stars_for(percentage: f64) -> u8 {
    if percentage >= 90.0 {
        5
    } else if percentage >= 75.0 {
        4
    } else if percentage >= 60.0 {
        3
    } else if percentage >= 45.0 {
        2
    } else {
        1
    }
}

fn factor(name: &str, score: f64, weight: f64, detail: String) -> FactorScore {
    let achieved = if weight > 0.0 { score / weight * 100.0 } else { 0.0 };
    FactorScore {
        factor: name.to_string(),
        score,
        weight,
        detail: format!("{detail} - {achieved:.0}% of {weight:.0}"),
    }
}

pub fn rate_developer(
    stats: &AssigneeStats,
    team: &TeamAverages,
    profile: RatingProfile,
    failures: FailureProfile,
) -> DeveloperRating {
    let w = profile.weights();
    let mut factors = Vec::with_capacity(7);

    factors.push(factor(
        "story_points",
        relative_score(stats.total_story_points, team.story_points, w.story_points),
        w.story_points,
        format!(
            "Story points: {:.1} (team avg {:.1})",
            stats.total_story_points, team.story_points
        ),
    ));

    let closed_ratio = if stats.total_issues > 0 {
        (f64::from(stats.closed_issues) / f64::from(stats.total_issues)).min(1.0)
    } else {
        0.0
    };
    factors.push(factor(
        "completion",
        closed_ratio * w.completion,
        w.completion,
        format!(
            "Completion: {}/{} issues closed ({:.0}%)",
            stats.closed_issues,
            stats.total_issues,
            closed_ratio * 100.0
        ),
    ));

    factors.push(factor(
        "dev_time",
        dev_time_score(stats.avg_development_time_days, team.dev_time_days, w.dev_time),
        w.dev_time,
        format!(
            "Avg dev time: {:.1} days (team avg {:.1})",
            stats.avg_development_time_days, team.dev_time_days
        ),
    ));

    if profile == RatingProfile::WithGithub {
        let activity = stats.github_activity.clone().unwrap_or_default();

        // Skipped entirely when no teammate has commit / PR data.
        if team.commits > 0.0 {
            factors.push(factor(
                "commits",
                relative_score(activity.commits as f64, team.commits, w.commits),
                w.commits,
                format!(
                    "GitHub commits: {} (team avg {:.1})",
                    activity.commits, team.commits
                ),
            ));
        }
        if team.merged_prs > 0.0 {
            factors.push(factor(
                "merged_prs",
                relative_score(activity.prs_merged as f64, team.merged_prs, w.merged_prs),
                w.merged_prs,
                format!(
                    "Merged PRs: {} (team avg {:.1})",
                    activity.prs_merged, team.merged_prs
                ),
            ));
        }
    }

    let failure_rate = if stats.total_issues > 0 {
        f64::from(failures.ticket_fails) / f64::from(stats.total_issues)
    } else {
        0.0
    };
    factors.push(factor(
        "quality",
        (w.quality * (1.0 - 2.0 * failure_rate)).max(0.0),
        w.quality,
        format!(
            "Quality: {} of {} issues failed ({:.0}% failure rate)",
            failures.ticket_fails,
            stats.total_issues,
            failure_rate * 100.0
        ),
    ));

    let (recovery_score, recovery_detail) = if failures.ticket_fails == 0 {
        (w.recovery, "Recovery: no failed tickets".to_string())
    } else {
        let rate = (f64::from(failures.ticket_unfailed) / f64::from(failures.ticket_fails)).min(1.0);
        (
            rate * w.recovery,
            format!(
                "Recovery: {}/{} failed tickets recovered",
                failures.ticket_unfailed, failures.ticket_fails
            ),
        )
    };
    factors.push(factor("recovery", recovery_score, w.recovery, recovery_detail));

    let score: f64 = factors.iter().map(|f| f.score).sum();
    let max_score: f64 = factors.iter().map(|f| f.weight).sum();
    let percentage = if max_score > 0.0 {
        (score / max_score * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    DeveloperRating {
        stars: stars_for(percentage),
        percentage,
        breakdown: factors.iter().map(|f| f.detail.clone()).collect(),
        factors,
    }
}

/// Rate every roster entry and order by stars, then total story points.
pub fn rank_developers(
    roster: &[AssigneeStats],
    failures: &BTreeMap<String, FailureProfile>,
    profile: RatingProfile,
) -> Vec<RankedDeveloper> {
    let team = TeamAverages::from_roster(roster);

    let mut ranked: Vec<RankedDeveloper> = roster
        .iter()
        .map(|stats| {
            let failure_profile = failures.get(&stats.name).copied().unwrap_or_default();
            RankedDeveloper {
                rank: 0,
                name: stats.name.clone(),
                total_story_points: stats.total_story_points,
                failures: failure_profile,
                rating: rate_developer(stats, &team, profile, failure_profile),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.rating
            .stars
            .cmp(&a.rating.stars)
            .then_with(|| b.total_story_points.total_cmp(&a.total_story_points))
    });
    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    ranked
}
