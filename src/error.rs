use std::path::PathBuf;

use thiserror::Error;

use crate::sources::SourceKind;

/// Hard failures that stop a league from being loaded.
///
/// Data-shape problems inside the records are never errors; see `quality`.
#[derive(Debug, Error)]
pub enum LeagueError {
    #[error("cannot tell which source {0} is (expected leaderboard, points, ecr or previous in the file name)")]
    UnknownSource(PathBuf),

    #[error("league {league} is missing its {} source", .kind.name())]
    MissingSource { league: String, kind: SourceKind },

    #[error("league not found: {0}")]
    LeagueNotFound(String),
}
