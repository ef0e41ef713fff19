// 🗂️ Source Loaders - Turn extracted standings files into partial Team records
//
// The scrape/extraction step writes one file per table it pulled off the
// league page. Each table has its own shape; every row becomes a partial Team
// that only fills the fields that table knows about.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::error::LeagueError;
use crate::team::Team;

// ============================================================================
// SOURCE KIND
// ============================================================================

/// Which table a file came from. Declaration order is merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Leaderboard,
    Points,
    ExpertConsensus,
    PreviousRanks,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Leaderboard,
        SourceKind::Points,
        SourceKind::ExpertConsensus,
        SourceKind::PreviousRanks,
    ];

    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Leaderboard => "Leaderboard",
            SourceKind::Points => "Points Scored",
            SourceKind::ExpertConsensus => "Expert Consensus",
            SourceKind::PreviousRanks => "Previous Ranks",
        }
    }

    /// Short code for internal use
    pub fn code(&self) -> &'static str {
        match self {
            SourceKind::Leaderboard => "lb",
            SourceKind::Points => "pts",
            SourceKind::ExpertConsensus => "ecr",
            SourceKind::PreviousRanks => "prev",
        }
    }

    /// Leaderboard and points must be present for a league to rank at all
    pub fn is_required(&self) -> bool {
        matches!(self, SourceKind::Leaderboard | SourceKind::Points)
    }
}

// ============================================================================
// ROW SHAPES
// ============================================================================

/// `{name, url, wins, losses, ties, pct, gamesBack}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
    #[serde(default)]
    pub ties: Option<u32>,
    #[serde(default)]
    pub pct: Option<f64>,
    #[serde(default)]
    pub games_back: Option<String>,
}

impl From<LeaderboardRow> for Team {
    fn from(row: LeaderboardRow) -> Self {
        let mut team = Team {
            url: row.url,
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
            pct: row.pct,
            games_back: row.games_back,
            ..Team::named(row.name.trim())
        };
        team.record = team.derived_record();
        team
    }
}

/// `{name, pointsFor, pointsAgainst, home, away, division, streak}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRow {
    pub name: String,
    #[serde(default)]
    pub points_for: Option<f64>,
    #[serde(default)]
    pub points_against: Option<f64>,
    #[serde(default)]
    pub home: Option<String>,
    #[serde(default)]
    pub away: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub streak: Option<String>,
}

impl From<PointsRow> for Team {
    fn from(row: PointsRow) -> Self {
        Team {
            points_for: row.points_for,
            points_against: row.points_against,
            home: row.home,
            away: row.away,
            division: row.division,
            streak: row.streak,
            ..Team::named(row.name.trim())
        }
    }
}

/// `{name, previousRank, ecrRank}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcrRow {
    pub name: String,
    #[serde(default)]
    pub previous_rank: Option<u32>,
    #[serde(default)]
    pub ecr_rank: Option<u32>,
}

impl From<EcrRow> for Team {
    fn from(row: EcrRow) -> Self {
        Team {
            previous_rank: row.previous_rank,
            ecr_rank: row.ecr_rank,
            ..Team::named(row.name.trim())
        }
    }
}

/// `{name, previousRank}` from the league office power-rank list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousRankRow {
    pub name: String,
    #[serde(default)]
    pub previous_rank: Option<u32>,
}

impl From<PreviousRankRow> for Team {
    fn from(row: PreviousRankRow) -> Self {
        Team {
            previous_rank: row.previous_rank,
            ..Team::named(row.name.trim())
        }
    }
}

// ============================================================================
// DEFAULT ECR FEED
// ============================================================================

/// The league's pre-configured expert consensus list, used when no feed file is supplied
pub fn default_ecr_feed() -> Vec<EcrRow> {
    const FEED: [(&str, u32, u32); 12] = [
        ("Zeke and Dez's Homemade Soup", 1, 12),
        ("Puttin' on the  Fitz", 5, 11),
        ("DeezNutz Dee", 3, 10),
        ("Make America  Gronk Again", 2, 9),
        ("League Champ", 8, 8),
        ("Saskatoon Spankers", 4, 7),
        ("Choke  Champs", 10, 6),
        ("When I Palm'er It Fitz", 7, 5),
        ("Off Constantly", 6, 4),
        ("Team Lengyel", 12, 3),
        ("I Hugged Calais Campbell", 9, 2),
        ("DJBetrayedUs Traitor", 11, 1),
    ];

    FEED.iter()
        .map(|(name, previous_rank, ecr_rank)| EcrRow {
            name: name.to_string(),
            previous_rank: Some(*previous_rank),
            ecr_rank: Some(*ecr_rank),
        })
        .collect()
}

// ============================================================================
// LOADERS
// ============================================================================

/// SourceLoader - read one source file into partial team records
pub trait SourceLoader: Send + Sync {
    fn load(&self, file_path: &Path) -> Result<Vec<Team>>;

    fn kind(&self) -> SourceKind;
}

fn rows_into_teams<R: Into<Team>>(rows: Vec<R>) -> Vec<Team> {
    rows.into_iter().map(Into::into).collect()
}

fn read_json<R: DeserializeOwned>(file_path: &Path) -> Result<Vec<R>> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse JSON rows in {}", file_path.display()))
}

fn read_csv<R: DeserializeOwned>(file_path: &Path) -> Result<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;

    let mut rows = Vec::new();
    for (line_num, result) in reader.deserialize().enumerate() {
        let row: R = result.with_context(|| {
            format!("Failed to parse CSV line {} in {}", line_num + 2, file_path.display())
        })?;
        rows.push(row);
    }
    Ok(rows)
}

/// JSON array of rows, as written by the extraction step
pub struct JsonSourceLoader {
    kind: SourceKind,
}

impl JsonSourceLoader {
    pub fn new(kind: SourceKind) -> Self {
        JsonSourceLoader { kind }
    }
}

impl SourceLoader for JsonSourceLoader {
    fn load(&self, file_path: &Path) -> Result<Vec<Team>> {
        Ok(match self.kind {
            SourceKind::Leaderboard => rows_into_teams(read_json::<LeaderboardRow>(file_path)?),
            SourceKind::Points => rows_into_teams(read_json::<PointsRow>(file_path)?),
            SourceKind::ExpertConsensus => rows_into_teams(read_json::<EcrRow>(file_path)?),
            SourceKind::PreviousRanks => rows_into_teams(read_json::<PreviousRankRow>(file_path)?),
        })
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}

/// Headered CSV with camelCase column names (the usual shape of a hand-kept ECR sheet)
pub struct CsvSourceLoader {
    kind: SourceKind,
}

impl CsvSourceLoader {
    pub fn new(kind: SourceKind) -> Self {
        CsvSourceLoader { kind }
    }
}

impl SourceLoader for CsvSourceLoader {
    fn load(&self, file_path: &Path) -> Result<Vec<Team>> {
        Ok(match self.kind {
            SourceKind::Leaderboard => rows_into_teams(read_csv::<LeaderboardRow>(file_path)?),
            SourceKind::Points => rows_into_teams(read_csv::<PointsRow>(file_path)?),
            SourceKind::ExpertConsensus => rows_into_teams(read_csv::<EcrRow>(file_path)?),
            SourceKind::PreviousRanks => rows_into_teams(read_csv::<PreviousRankRow>(file_path)?),
        })
    }

    fn kind(&self) -> SourceKind {
        self.kind
    }
}

// ============================================================================
// FACTORY FUNCTIONS
// ============================================================================

/// Detect source kind from the file name
///
/// ```
/// use power_rankings::sources::{detect_source, SourceKind};
/// use std::path::Path;
///
/// assert_eq!(detect_source(Path::new("leaderboard.json")).unwrap(), SourceKind::Leaderboard);
/// assert_eq!(detect_source(Path::new("ecr_week9.csv")).unwrap(), SourceKind::ExpertConsensus);
/// ```
pub fn detect_source(file_path: &Path) -> Result<SourceKind, LeagueError> {
    let filename = file_path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if filename.contains("leaderboard") || filename.contains("standings") {
        return Ok(SourceKind::Leaderboard);
    }

    if filename.contains("points") {
        return Ok(SourceKind::Points);
    }

    if filename.contains("ecr") || filename.contains("consensus") {
        return Ok(SourceKind::ExpertConsensus);
    }

    if filename.contains("previous") || filename.contains("rankings") {
        return Ok(SourceKind::PreviousRanks);
    }

    Err(LeagueError::UnknownSource(file_path.to_path_buf()))
}

/// Loader for a known kind, chosen by extension only: `.csv` → CSV, anything else → JSON
pub fn loader_for(kind: SourceKind, file_path: &Path) -> Box<dyn SourceLoader> {
    let is_csv = file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Box::new(CsvSourceLoader::new(kind))
    } else {
        Box::new(JsonSourceLoader::new(kind))
    }
}

/// Detect the kind from the file name, then pick a loader for it
pub fn get_loader(file_path: &Path) -> Result<Box<dyn SourceLoader>, LeagueError> {
    let kind = detect_source(file_path)?;
    Ok(loader_for(kind, file_path))
}

/// Detect + load in one step
pub fn load_source(file_path: &Path) -> Result<(SourceKind, Vec<Team>)> {
    let loader = get_loader(file_path)?;
    let teams = loader.load(file_path)?;
    Ok((loader.kind(), teams))
}

/// Load a file as the given kind, whatever it is called
pub fn load_source_as(kind: SourceKind, file_path: &Path) -> Result<Vec<Team>> {
    loader_for(kind, file_path).load(file_path)
}

// ============================================================================
// TESTS
// ============================================================================
