// 📊 Metric Rank Generators - One sub-score per team, per metric
//
// Each generator reads the merged base teams and returns partial records that
// carry only `name` + one score field. They never see each other's output.

use std::cmp::Ordering;

use crate::team::Team;

/// League-size multiplier applied to win percentage
pub const RECORD_SCALE: f64 = 12.0;

/// Round to two decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// recordScore = round(pct * 12, 2)
pub fn rank_record(teams: &[Team]) -> Vec<Team> {
    teams
        .iter()
        .map(|team| Team {
            record_score: team.pct.map(|pct| round2(pct * RECORD_SCALE)),
            ..Team::named(team.name.clone())
        })
        .collect()
}

/// pointsScore = 1-based position when sorted ascending by pointsFor.
///
/// The fewest points scored gets pointsScore 1. Teams without pointsFor
/// get no pointsScore and don't take up a position.
pub fn rank_points_scored(teams: &[Team]) -> Vec<Team> {
    let mut scored: Vec<(&Team, f64)> = teams
        .iter()
        .filter_map(|team| team.points_for.map(|pf| (team, pf)))
        .collect();

    // stable: equal totals keep base (name) order
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut out: Vec<Team> = scored
        .into_iter()
        .enumerate()
        .map(|(index, (team, _))| Team {
            points_score: Some(index as u32 + 1),
            ..Team::named(team.name.clone())
        })
        .collect();

    out.extend(
        teams
            .iter()
            .filter(|team| team.points_for.is_none())
            .map(|team| Team::named(team.name.clone())),
    );

    out
}

/// ecrScore = ecrRank, unchanged
pub fn rank_ecr(teams: &[Team]) -> Vec<Team> {
    teams
        .iter()
        .map(|team| Team {
            ecr_score: team.ecr_rank,
            ..Team::named(team.name.clone())
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
