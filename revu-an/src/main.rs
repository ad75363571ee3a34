//! revu-an - Review Analytics Service
//!
//! Serves dashboard aggregates over the review store: overview metrics
//! with trends and sparklines, daily sentiment dynamics and top topics.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use revu_an::{build_router, AnalyticsConfig, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting revu-an (Review Analytics) service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: ENV → TOML → defaults
    let config_path = revu_common::config::config_file_path();
    let toml_config = revu_common::config::load_toml_config(&config_path)?;
    let config = AnalyticsConfig::resolve(&toml_config);

    tracing::info!("Database: {}", config.database_path.display());
    let db_pool = revu_common::db::init_database_pool(&config.database_path).await?;
    tracing::info!("Database connection established");

    let state = AppState::new(db_pool);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.bind_port)).await?;
    tracing::info!("Listening on http://127.0.0.1:{}", config.bind_port);
    tracing::info!("Health check: http://127.0.0.1:{}/health", config.bind_port);

    axum::serve(listener, app).await?;

    Ok(())
}
