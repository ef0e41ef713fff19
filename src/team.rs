// 🏈 Team Entity - One record per team, filled in as it flows through the pipeline
//
// Every field except `name` is optional. An absent field means "this source
// didn't say", which is what makes field-union merging possible.

use serde::{Deserialize, Serialize};

use crate::delta::{Change, Direction};

// ============================================================================
// CANONICAL NAME
// ============================================================================

/// Merge key for a team name: trimmed and uppercased.
///
/// Internal whitespace is left alone, so `"Choke  Champs"` and `"Choke Champs"`
/// are still two different teams.
pub fn canonical_name(name: &str) -> String {
    name.trim().to_uppercase()
}

// ============================================================================
// TEAM
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    pub name: String,

    // ========================================================================
    // LEADERBOARD
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Derived "W-L-T" string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ties: Option<u32>,

    /// Win fraction, 0.0 - 1.0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pct: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_back: Option<String>,

    // ========================================================================
    // POINTS TABLE
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_for: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_against: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<String>,

    // ========================================================================
    // EXPERT CONSENSUS / PRIOR STANDING
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rank: Option<u32>,

    /// Lower is better
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecr_rank: Option<u32>,

    // ========================================================================
    // DERIVED SUB-SCORES
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_score: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecr_score: Option<u32>,

    // ========================================================================
    // DERIVED RANKING
    // ========================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Change>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

/// Overwrite `$dst.field` with `$src.field` for every listed field that is present on `$src`.
macro_rules! union_fields {
    ($dst:expr, $src:expr; $($field:ident),+ $(,)?) => {
        $(
            if $src.$field.is_some() {
                $dst.$field = $src.$field;
            }
        )+
    };
}

impl Team {
    /// Create a bare team that only carries its identity
    pub fn named(name: impl Into<String>) -> Self {
        Team {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Merge key (see [`canonical_name`])
    pub fn key(&self) -> String {
        canonical_name(&self.name)
    }

    /// Field union: every field present on `later` overwrites ours, absent fields leave ours alone.
    ///
    /// The displayed spelling of `name` follows the same rule.
    pub fn absorb(&mut self, later: Team) {
        if !later.name.is_empty() {
            self.name = later.name;
        }

        union_fields!(self, later;
            url, record, wins, losses, ties, pct, games_back,
            points_for, points_against, home, away, division, streak,
            previous_rank, ecr_rank,
            record_score, points_score, ecr_score,
            score, rank, change, direction, delta,
        );
    }

    /// Sum of the three sub-scores, or None if any of them is missing
    pub fn composite_score(&self) -> Option<f64> {
        let record = self.record_score?;
        let points = self.points_score?;
        let ecr = self.ecr_score?;
        Some(record + points as f64 + ecr as f64)
    }

    /// Display fields carried into the final ranking
    pub fn basic_info(&self) -> Team {
        Team {
            name: self.name.clone(),
            url: self.url.clone(),
            record: self.record.clone().or_else(|| self.derived_record()),
            previous_rank: self.previous_rank,
            ..Default::default()
        }
    }

    /// "W-L-T" from the individual counters, if all three are known
    pub fn derived_record(&self) -> Option<String> {
        match (self.wins, self.losses, self.ties) {
            (Some(w), Some(l), Some(t)) => Some(format!("{}-{}-{}", w, l, t)),
            _ => None,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_trims_and_uppercases() {
        assert_eq!(canonical_name("  League Champ "), "LEAGUE CHAMP");
        assert_eq!(canonical_name("Choke  Champs"), "CHOKE  CHAMPS");
    }

    #[test]
    fn test_absorb_is_field_union() {
        let mut team = Team {
            pct: Some(0.5),
            url: Some("/teams/1".to_string()),
            ..Team::named("A")
        };
        let later = Team {
            points_for: Some(1000.0),
            url: None,
            ..Team::named("A")
        };

        team.absorb(later);

        assert_eq!(team.pct, Some(0.5));
        assert_eq!(team.points_for, Some(1000.0));
        assert_eq!(team.url.as_deref(), Some("/teams/1"));
    }

    #[test]
    fn test_absorb_later_value_wins() {
        let mut team = Team {
            previous_rank: Some(4),
            ..Team::named("a")
        };
        team.absorb(Team {
            previous_rank: Some(7),
            ..Team::named("A")
        });

        assert_eq!(team.previous_rank, Some(7));
        assert_eq!(team.name, "A");
    }

    #[test]
    fn test_composite_score_requires_all_parts() {
        let mut team = Team {
            record_score: Some(6.5),
            points_score: Some(3),
            ..Team::named("A")
        };
        assert_eq!(team.composite_score(), None);

        team.ecr_score = Some(10);
        assert_eq!(team.composite_score(), Some(19.5));
    }

    #[test]
    fn test_basic_info_derives_record() {
        let team = Team {
            wins: Some(7),
            losses: Some(5),
            ties: Some(0),
            points_for: Some(1203.4),
            previous_rank: Some(2),
            ..Team::named("League Champ")
        };

        let info = team.basic_info();
        assert_eq!(info.record.as_deref(), Some("7-5-0"));
        assert_eq!(info.previous_rank, Some(2));
        assert_eq!(info.points_for, None);
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent() {
        let team = Team {
            points_for: Some(1100.0),
            ..Team::named("A")
        };
        let json = serde_json::to_value(&team).unwrap();

        assert_eq!(json["pointsFor"], 1100.0);
        assert!(json.get("pct").is_none());
    }
}
