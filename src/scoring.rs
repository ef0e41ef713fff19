// 🏆 Composite Scorer - Sum the sub-scores and rank the league
//
//   score = recordScore + pointsScore + ecrScore
//
// No normalization: recordScore is continuous 0-12, the other two are 1..N
// ranks. Highest score = rank 1. Equal scores are ordered by canonical name.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::delta::rank_classes;
use crate::merge::{merge_pair, merge_sources};
use crate::metrics::{rank_ecr, rank_points_scored, rank_record};
use crate::team::Team;

/// Ordering for the final table: score descending, unscored last, then by name
fn by_score_desc(a: &Team, b: &Team) -> Ordering {
    let by_score = match (a.score, b.score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score.then_with(|| a.key().cmp(&b.key()))
}

/// Merge the three sub-score lists, sum them, sort and assign ranks 1..N
pub fn merge_rankings(record: Vec<Team>, points: Vec<Team>, ecr: Vec<Team>) -> Vec<Team> {
    let mut rankings = merge_sources([record, points, ecr]);

    for team in rankings.iter_mut() {
        team.score = team.composite_score();
    }

    rankings.sort_by(by_score_desc);

    for (index, team) in rankings.iter_mut().enumerate() {
        team.rank = Some(index as u32 + 1);
    }

    rankings
}

/// Full scoring pass over the merged base teams.
///
/// Returns the display-ready list ordered by rank: basic info + sub-scores,
/// composite score, rank and movement classification.
pub fn score_teams(base: &[Team]) -> Vec<Team> {
    let rankings = merge_rankings(rank_record(base), rank_points_scored(base), rank_ecr(base));

    let basic: Vec<Team> = base.iter().map(Team::basic_info).collect();
    let rankings = merge_pair(basic, rankings);

    let classes = rank_classes(&rankings);
    let mut rankings = merge_pair(classes, rankings);
    rankings.sort_by_key(|team| team.rank);

    let unscored = rankings.iter().filter(|t| t.score.is_none()).count();
    if unscored > 0 {
        debug!(unscored, "teams ranked without a composite score");
    }
    if let Some(top) = rankings.first() {
        info!(
            teams = rankings.len(),
            leader = %top.name,
            score = ?top.score,
            "computed power rankings"
        );
    }

    rankings
}

// ============================================================================
// TESTS
// ============================================================================
