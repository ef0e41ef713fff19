// Power Rankings - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod team;      // Team record + canonical names
pub mod merge;     // Field-union merge across sources
pub mod metrics;   // Record / points / ECR sub-scores
pub mod scoring;   // Composite score + rank assignment
pub mod delta;     // Week-over-week movement
pub mod sources;   // Source files → partial team records
pub mod league;    // Per-league pipeline + report
pub mod quality;   // Input data quality checks
pub mod config;
pub mod error;
pub mod logging;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use team::{canonical_name, Team};
pub use merge::{merge_pair, merge_sources};
pub use metrics::{rank_ecr, rank_points_scored, rank_record, RECORD_SCALE};
pub use scoring::{merge_rankings, score_teams};
pub use delta::{classify, classify_movement, rank_classes, Change, Direction, RankDelta};
pub use sources::{
    default_ecr_feed, detect_source, get_loader, load_source, load_source_as, loader_for,
    CsvSourceLoader, JsonSourceLoader, SourceKind, SourceLoader,
    EcrRow, LeaderboardRow, PointsRow, PreviousRankRow,
};
pub use league::{League, LeagueSources, RankedTeam};
pub use quality::{QualityIssue, QualityReport, Severity};
pub use config::Config;
pub use error::LeagueError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
