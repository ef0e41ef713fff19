// 📈 Delta Calculator - How far did each team move since last week?
//
//   Δ = previous_rank - rank
//   Δ > 0 → moved up, Δ < 0 → moved down, Δ == 0 → no change

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::team::Team;

// ============================================================================
// CHANGE
// ============================================================================

/// Size of a rank movement, rendered as `"--"` when the team stayed put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Unchanged,
    Moved(u32),
}

impl Change {
    pub fn as_text(&self) -> String {
        match self {
            Change::Unchanged => "--".to_string(),
            Change::Moved(n) => n.to_string(),
        }
    }
}

impl Serialize for Change {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Change::Unchanged => serializer.serialize_str("--"),
            Change::Moved(n) => serializer.serialize_u32(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Change {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Moved(u32),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Moved(n) => Ok(Change::Moved(n)),
            Raw::Text(s) if s == "--" => Ok(Change::Unchanged),
            Raw::Text(s) => Err(serde::de::Error::custom(format!(
                "expected \"--\" or a number, got {:?}",
                s
            ))),
        }
    }
}

// ============================================================================
// DIRECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Up,
    Down,
    NoChange,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::NoChange => "no-change",
        }
    }

    /// CSS classes the rankings view hangs off the delta cell
    pub fn delta_class(&self) -> &'static str {
        match self {
            Direction::Up => "delta delta-up",
            Direction::Down => "delta delta-down",
            Direction::NoChange => "delta",
        }
    }
}

// ============================================================================
// RANK DELTA
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RankDelta {
    pub change: Change,
    pub direction: Direction,
    pub delta: &'static str,
}

/// Classify a movement from `previous_rank` to `rank`
pub fn classify_movement(previous_rank: u32, rank: u32) -> RankDelta {
    let diff = previous_rank as i64 - rank as i64;

    let (change, direction) = if diff == 0 {
        (Change::Unchanged, Direction::NoChange)
    } else if diff > 0 {
        (Change::Moved(diff.unsigned_abs() as u32), Direction::Up)
    } else {
        (Change::Moved(diff.unsigned_abs() as u32), Direction::Down)
    };

    RankDelta {
        change,
        direction,
        delta: direction.delta_class(),
    }
}

/// Classify a ranked team. Teams without a previous rank (or not yet ranked) get nothing.
pub fn classify(team: &Team) -> Option<RankDelta> {
    Some(classify_movement(team.previous_rank?, team.rank?))
}

/// Partial records carrying only name + classification, ready to be merged onto the ranking
pub fn rank_classes(teams: &[Team]) -> Vec<Team> {
    teams
        .iter()
        .filter_map(|team| {
            classify(team).map(|d| Team {
                change: Some(d.change),
                direction: Some(d.direction),
                delta: Some(d.delta.to_string()),
                ..Team::named(team.name.clone())
            })
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
