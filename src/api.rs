// 🌐 REST API - Power rankings over HTTP
//
//   GET /api/health
//   GET /api/scrape                     → missing league id message
//   GET /api/scrape/:league_id          → League (teams + rankings)
//   GET /api/scrape/:league_id/quality  → QualityReport

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::LeagueError;
use crate::league::League;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

/// API Response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// Map a load failure onto a status code.
///
/// The client only sees the typed error message; the full chain goes to the log.
fn error_response(err: anyhow::Error) -> Response {
    let (status, message) = match err.downcast_ref::<LeagueError>() {
        Some(e @ LeagueError::LeagueNotFound(_)) => (StatusCode::NOT_FOUND, e.to_string()),
        Some(e @ LeagueError::MissingSource { .. }) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load league data.".to_string(),
        ),
    };

    match status {
        StatusCode::NOT_FOUND => {}
        StatusCode::UNPROCESSABLE_ENTITY => warn!("Incomplete league: {:#}", err),
        _ => error!("Error loading league: {:#}", err),
    }

    (status, Json(ApiResponse::<()>::err(message))).into_response()
}

/// Reject ids that would escape the data directory
fn valid_league_id(league_id: &str) -> bool {
    !league_id.is_empty()
        && league_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn load_league(state: &AppState, league_id: &str) -> anyhow::Result<League> {
    if !valid_league_id(league_id) {
        return Err(LeagueError::LeagueNotFound(league_id.to_string()).into());
    }

    let dir = state.config.league_dir(league_id);
    let sources = state.config.load_league(&dir)?;
    Ok(League::rank(&sources))
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/scrape - No league given
async fn missing_league() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Missing league ID parameter.",
    })
}

/// GET /api/scrape/:league_id - Rank a league
async fn get_rankings(State(state): State<AppState>, Path(league_id): Path<String>) -> Response {
    match load_league(&state, &league_id) {
        Ok(league) => {
            info!("{}", league.summary());
            (StatusCode::OK, Json(ApiResponse::ok(league))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// GET /api/scrape/:league_id/quality - Data quality report for a league
async fn get_quality(State(state): State<AppState>, Path(league_id): Path<String>) -> Response {
    match load_league(&state, &league_id) {
        Ok(league) => (StatusCode::OK, Json(ApiResponse::ok(league.quality()))).into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(config: Config) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/scrape", get(missing_league))
        .route("/scrape/:league_id", get(get_rankings))
        .route("/scrape/:league_id/quality", get(get_quality))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_config() -> Config {
        Config {
            data_dir: std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"),
            ..Config::default()
        }
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        get_json_with(test_config(), uri).await
    }

    async fn get_json_with(config: Config, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router(config)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_missing_league_message() {
        let (status, body) = get_json("/api/scrape").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Missing league ID parameter.");
    }

    #[tokio::test]
    async fn test_rankings_for_fixture_league() {
        let (status, body) = get_json("/api/scrape/league").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let rankings = body["data"]["rankings"].as_array().unwrap();
        assert_eq!(rankings.len(), 12);
        assert_eq!(rankings[0]["rank"], 1);
        assert_eq!(body["data"]["name"], "Saskatoon Fantasy League");
    }

    #[tokio::test]
    async fn test_unknown_league_is_404() {
        let (status, body) = get_json("/api/scrape/no-such-league").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    /// Data dir holding a single league `week9` with the given files
    fn temp_league(files: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
        let data_dir = tempfile::tempdir().unwrap();
        let league_dir = data_dir.path().join("week9");
        std::fs::create_dir(&league_dir).unwrap();
        for (name, contents) in files {
            std::fs::write(league_dir.join(name), contents).unwrap();
        }

        let config = Config {
            data_dir: data_dir.path().to_path_buf(),
            ..Config::default()
        };
        (data_dir, config)
    }

    #[tokio::test]
    async fn test_missing_points_source_is_422() {
        let (_dir, config) = temp_league(&[("leaderboard.json", r#"[{"name": "A", "pct": 0.5}]"#)]);

        let (status, body) = get_json_with(config, "/api/scrape/week9").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "league week9 is missing its Points Scored source");
    }

    #[tokio::test]
    async fn test_unreadable_source_is_500_without_paths() {
        let (dir, config) = temp_league(&[
            ("leaderboard.json", r#"[{"name": "A", "pct": 0.5}]"#),
            ("points.json", "not json"),
        ]);

        let (status, body) = get_json_with(config, "/api/scrape/week9").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);

        let message = body["error"].as_str().unwrap();
        assert_eq!(message, "Failed to load league data.");
        assert!(!message.contains(&*dir.path().to_string_lossy()));
    }

    #[tokio::test]
    async fn test_quality_endpoint() {
        let (status, body) = get_json("/api/scrape/league/quality").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["team_count"], 12);
    }

    #[test]
    fn test_valid_league_id() {
        assert!(valid_league_id("888433"));
        assert!(!valid_league_id(".."));
        assert!(!valid_league_id(""));
    }
}
