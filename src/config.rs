use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::league::LeagueSources;
use crate::sources::{load_source_as, SourceKind};

#[derive(Debug, Clone)]
pub struct Config {
    /// One sub-directory per league id
    pub data_dir: PathBuf,

    /// Replaces the built-in expert consensus feed when set
    pub ecr_feed: Option<PathBuf>,

    pub bind_addr: SocketAddr,

    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            ecr_feed: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Config::default();

        let data_dir = env::var("POWER_RANKINGS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let ecr_feed = env::var("POWER_RANKINGS_ECR_FEED")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let bind_addr = match env::var("POWER_RANKINGS_BIND_ADDR") {
            Ok(raw) => raw
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid POWER_RANKINGS_BIND_ADDR: {}", raw))?,
            Err(_) => defaults.bind_addr,
        };

        let log_filter = env::var("RUST_LOG").unwrap_or(defaults.log_filter);

        Ok(Config {
            data_dir,
            ecr_feed,
            bind_addr,
            log_filter,
        })
    }

    pub fn league_dir(&self, league_id: &str) -> PathBuf {
        self.data_dir.join(league_id)
    }

    /// Load a league directory and fill in the configured (or built-in) ECR feed
    pub fn load_league(&self, dir: &Path) -> Result<LeagueSources> {
        let sources = LeagueSources::load_dir(dir)?;
        sources.check_required()?;

        match &self.ecr_feed {
            Some(feed_path) => {
                let feed = load_source_as(SourceKind::ExpertConsensus, feed_path)
                    .with_context(|| format!("Failed to load ECR feed {}", feed_path.display()))?;
                Ok(sources.or_ecr_feed(feed))
            }
            None => Ok(sources.or_default_ecr()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LeagueError;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.league_dir("888433"), PathBuf::from("data/888433"));
    }

    #[test]
    fn test_load_league_uses_default_feed() {
        let config = Config {
            data_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
            ..Config::default()
        };

        let sources = config.load_league(&config.league_dir("league")).unwrap();
        assert_eq!(sources.sources[&SourceKind::ExpertConsensus].len(), 12);
    }

    #[test]
    fn test_load_league_requires_points() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leaderboard.json"), r#"[{"name": "A", "pct": 0.5}]"#).unwrap();

        let err = Config::default().load_league(dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeagueError>(),
            Some(LeagueError::MissingSource { kind: SourceKind::Points, .. })
        ));
    }

    #[test]
    fn test_load_league_with_feed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leaderboard.json"), r#"[{"name": "A", "pct": 0.5}]"#).unwrap();
        std::fs::write(dir.path().join("points.json"), r#"[{"name": "A", "pointsFor": 900}]"#).unwrap();
        let feed_dir = tempfile::tempdir().unwrap();
        let feed = feed_dir.path().join("ecr.csv");
        std::fs::write(&feed, "name,previousRank,ecrRank\nA,1,1\n").unwrap();

        let config = Config {
            ecr_feed: Some(feed),
            ..Config::default()
        };
        let sources = config.load_league(dir.path()).unwrap();
        assert_eq!(sources.sources[&SourceKind::ExpertConsensus].len(), 1);
    }

    #[test]
    fn test_feed_file_name_does_not_matter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("leaderboard.json"), r#"[{"name": "A", "pct": 0.5}]"#).unwrap();
        std::fs::write(dir.path().join("points.json"), r#"[{"name": "A", "pointsFor": 900}]"#).unwrap();
        let feed_dir = tempfile::tempdir().unwrap();
        let csv_feed = feed_dir.path().join("expert_rankings.csv");
        std::fs::write(&csv_feed, "name,previousRank,ecrRank\nA,1,1\n").unwrap();
        let json_feed = feed_dir.path().join("week9.json");
        std::fs::write(&json_feed, r#"[{"name": "A", "previousRank": 2, "ecrRank": 1}]"#).unwrap();

        for feed in [csv_feed, json_feed] {
            let config = Config {
                ecr_feed: Some(feed),
                ..Config::default()
            };
            let teams = config.load_league(dir.path()).unwrap().merged_teams();
            assert_eq!(teams[0].ecr_rank, Some(1));

            let league = crate::league::League::rank(&config.load_league(dir.path()).unwrap());
            assert_eq!(league.rankings[0].score, Some(8.0));
        }
    }
}
