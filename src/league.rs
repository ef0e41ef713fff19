// 🧮 League Pipeline - sources → merge → sub-scores → composite → deltas
//
// Everything in here is a pure transform over in-memory lists. The only
// I/O is `LeagueSources::load_dir`, which finishes before ranking starts.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::delta::{Change, Direction};
use crate::error::LeagueError;
use crate::merge::merge_sources;
use crate::quality::QualityReport;
use crate::scoring::score_teams;
use crate::sources::{default_ecr_feed, detect_source, load_source, SourceKind};
use crate::team::Team;

// ============================================================================
// RANKED TEAM (output contract)
// ============================================================================

/// One row of the power rankings, rank 1 first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTeam {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<Change>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecr_score: Option<u32>,
}

impl From<Team> for RankedTeam {
    fn from(team: Team) -> Self {
        RankedTeam {
            name: team.name,
            url: team.url,
            record: team.record,
            previous_rank: team.previous_rank,
            change: team.change,
            direction: team.direction,
            delta: team.delta,
            rank: team.rank.unwrap_or_default(),
            score: team.score,
            record_score: team.record_score,
            points_score: team.points_score,
            ecr_score: team.ecr_score,
        }
    }
}

// ============================================================================
// LEAGUE SOURCES
// ============================================================================

#[derive(Debug, Deserialize)]
struct LeagueMeta {
    name: Option<String>,
}

/// Everything the pipeline needs for one league, grouped by source kind
#[derive(Debug, Clone, Default)]
pub struct LeagueSources {
    pub id: String,
    pub name: Option<String>,
    pub sources: BTreeMap<SourceKind, Vec<Team>>,
}

impl LeagueSources {
    pub fn new(id: impl Into<String>) -> Self {
        LeagueSources {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: attach a source list (replaces any list already held for that kind)
    pub fn with_source(mut self, kind: SourceKind, teams: Vec<Team>) -> Self {
        self.sources.insert(kind, teams);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load every recognised source file in a league directory.
    ///
    /// `league.json` (`{"name": ...}`) is optional metadata; files that don't
    /// look like any source are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let id = dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("league")
            .to_string();

        if !dir.is_dir() {
            return Err(LeagueError::LeagueNotFound(id).into());
        }

        let mut league = LeagueSources::new(id);

        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Failed to read league directory: {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

            if file_name.eq_ignore_ascii_case("league.json") {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let meta: LeagueMeta = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse {}", path.display()))?;
                league.name = meta.name;
                continue;
            }

            if detect_source(&path).is_err() {
                warn!(file = %path.display(), "skipping unrecognised file in league directory");
                continue;
            }

            let (kind, teams) = load_source(&path)?;
            debug!(file = %path.display(), source = kind.code(), rows = teams.len(), "loaded source");
            league.sources.entry(kind).or_default().extend(teams);
        }

        Ok(league)
    }

    /// Fail with `MissingSource` unless leaderboard and points are both present
    pub fn check_required(&self) -> Result<(), LeagueError> {
        for kind in SourceKind::ALL.iter().filter(|k| k.is_required()) {
            if !self.sources.contains_key(kind) {
                return Err(LeagueError::MissingSource {
                    league: self.id.clone(),
                    kind: *kind,
                });
            }
        }
        Ok(())
    }

    /// Fill the ECR slot with the given feed when the league didn't bring its own
    pub fn or_ecr_feed(mut self, feed: Vec<Team>) -> Self {
        self.sources.entry(SourceKind::ExpertConsensus).or_insert(feed);
        self
    }

    /// Fill the ECR slot with the built-in feed when the league didn't bring its own
    pub fn or_default_ecr(self) -> Self {
        let feed = default_ecr_feed().into_iter().map(Team::from).collect();
        self.or_ecr_feed(feed)
    }

    /// Merge all sources (leaderboard, points, ECR, previous ranks) into base teams
    pub fn merged_teams(&self) -> Vec<Team> {
        merge_sources(self.sources.values().cloned())
    }
}

// ============================================================================
// LEAGUE REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct League {
    pub id: String,
    pub name: Option<String>,
    pub teams: Vec<Team>,
    pub rankings: Vec<RankedTeam>,
    pub generated_at: DateTime<Utc>,
}

impl League {
    /// Run the whole pipeline over a league's sources
    pub fn rank(sources: &LeagueSources) -> League {
        let teams = sources.merged_teams();

        let quality = QualityReport::inspect(&teams);
        quality.log();

        let rankings = score_teams(&teams).into_iter().map(RankedTeam::from).collect();

        League {
            id: sources.id.clone(),
            name: sources.name.clone(),
            teams,
            rankings,
            generated_at: Utc::now(),
        }
    }

    pub fn quality(&self) -> QualityReport {
        QualityReport::inspect(&self.teams)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn summary(&self) -> String {
        match self.rankings.first() {
            Some(top) => format!(
                "{}: {} teams ranked, #1 {} ({})",
                self.display_name(),
                self.rankings.len(),
                top.name,
                top.score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_else(|| "no score".to_string())
            ),
            None => format!("{}: no teams ranked", self.display_name()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join("league")
    }

    fn fixture_league() -> League {
        let sources = LeagueSources::load_dir(&fixture_dir())
            .unwrap()
            .or_default_ecr();
        League::rank(&sources)
    }

    #[test]
    fn test_load_fixture_dir() {
        let sources = LeagueSources::load_dir(&fixture_dir()).unwrap();

        assert_eq!(sources.id, "league");
        assert_eq!(sources.name.as_deref(), Some("Saskatoon Fantasy League"));
        assert_eq!(sources.sources[&SourceKind::Leaderboard].len(), 12);
        assert_eq!(sources.sources[&SourceKind::Points].len(), 12);
        assert!(!sources.sources.contains_key(&SourceKind::ExpertConsensus));
        assert!(sources.check_required().is_ok());
    }

    #[test]
    fn test_end_to_end_with_default_feed() {
        let league = fixture_league();

        assert_eq!(league.teams.len(), 12);
        assert_eq!(league.rankings.len(), 12);

        for pair in league.rankings.windows(2) {
            assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
            assert_eq!(pair[0].rank + 1, pair[1].rank);
        }

        for team in &league.rankings {
            let recomputed = team.record_score.unwrap()
                + team.points_score.unwrap() as f64
                + team.ecr_score.unwrap() as f64;
            assert_eq!(team.score, Some(recomputed));
            assert!(team.record.is_some());
            assert!(team.change.is_some());
        }
    }

    #[test]
    fn test_end_to_end_soup_team() {
        let league = fixture_league();
        let soup = league
            .rankings
            .iter()
            .find(|t| t.name == "Zeke and Dez's Homemade Soup")
            .unwrap();

        assert_eq!(soup.ecr_score, Some(12));
        assert_eq!(soup.previous_rank, Some(1));
        assert!(soup.url.is_some());
    }

    #[test]
    fn test_missing_required_source() {
        let sources = LeagueSources::new("999")
            .with_source(SourceKind::Leaderboard, vec![Team::named("A")]);

        let err = sources.check_required().unwrap_err();
        assert!(matches!(err, LeagueError::MissingSource { kind: SourceKind::Points, .. }));
    }

    #[test]
    fn test_missing_dir_is_league_not_found() {
        let err = LeagueSources::load_dir(Path::new("/nonexistent/888433")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeagueError>(),
            Some(LeagueError::LeagueNotFound(id)) if id == "888433"
        ));
    }

    #[test]
    fn test_league_file_ecr_overrides_default() {
        let sources = LeagueSources::new("x")
            .with_source(SourceKind::ExpertConsensus, vec![Team { ecr_rank: Some(1), ..Team::named("A") }])
            .or_default_ecr();

        assert_eq!(sources.sources[&SourceKind::ExpertConsensus].len(), 1);
    }

    #[test]
    fn test_previous_ranks_merged_last() {
        let sources = LeagueSources::new("x")
            .with_source(SourceKind::PreviousRanks, vec![Team { previous_rank: Some(9), ..Team::named("A") }])
            .with_source(SourceKind::ExpertConsensus, vec![Team { previous_rank: Some(2), ecr_rank: Some(1), ..Team::named("A") }]);

        let teams = sources.merged_teams();
        assert_eq!(teams[0].previous_rank, Some(9));
        assert_eq!(teams[0].ecr_rank, Some(1));
    }

    #[test]
    fn test_output_contract_json() {
        let league = fixture_league();
        let json = serde_json::to_value(&league).unwrap();

        let first = &json["rankings"][0];
        for key in ["name", "url", "record", "previousRank", "change", "direction", "delta", "rank", "score", "recordScore", "pointsScore", "ecrScore"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(first["rank"], 1);
        assert!(json.get("generatedAt").is_some());
    }

    #[test]
    fn test_summary() {
        let league = fixture_league();
        assert!(league.summary().starts_with("Saskatoon Fantasy League: 12 teams ranked"));

        let empty = League::rank(&LeagueSources::new("empty"));
        assert_eq!(empty.summary(), "empty: no teams ranked");
    }
}
