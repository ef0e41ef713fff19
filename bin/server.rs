// Power Rankings - Web Server
// Serves the ranking pipeline as JSON under /api

use anyhow::{Context, Result};
use power_rankings::{api, logging, Config};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_filter);

    info!("🌐 Power Rankings - Web Server");

    if !config.data_dir.is_dir() {
        tracing::warn!(
            data_dir = %config.data_dir.display(),
            "data directory does not exist yet; every league will 404"
        );
    }

    let addr = config.bind_addr;
    let app = api::router(config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("   API: http://{}/api/scrape/<league_id>", addr);

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
