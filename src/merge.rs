// 🔗 Record Merger - Unify partial team records from every source
//
// Each source (leaderboard, points table, ECR feed, ...) only knows a few
// fields of a team. Records are keyed by canonical name in an ordered map and
// field-unioned in source order, so later sources win on overlapping fields.
//
// Output order = ascending canonical name (case-insensitive).

use std::collections::BTreeMap;

use tracing::debug;

use crate::team::Team;

/// Merge any number of source lists into one record per team.
///
/// Sources are visited in the order given; within the same team, a field set
/// by a later record overwrites one set by an earlier record.
pub fn merge_sources<I>(sources: I) -> Vec<Team>
where
    I: IntoIterator<Item = Vec<Team>>,
{
    let mut merged: BTreeMap<String, Team> = BTreeMap::new();
    let mut seen = 0usize;

    for source in sources {
        for team in source {
            seen += 1;
            match merged.get_mut(&team.key()) {
                Some(existing) => existing.absorb(team),
                None => {
                    merged.insert(team.key(), team);
                }
            }
        }
    }

    debug!(records = seen, teams = merged.len(), "merged team records");

    merged.into_values().collect()
}

/// Convenience for the common two-list case
pub fn merge_pair(earlier: Vec<Team>, later: Vec<Team>) -> Vec<Team> {
    merge_sources([earlier, later])
}

// ============================================================================
// TESTS
// ============================================================================
