//! revu-cl - Review Classification Service
//!
//! Accepts batches of free-text customer reviews over HTTP and classifies
//! each into topics and sentiments via the configured LLM completion
//! endpoint.

use anyhow::Result;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use revu_cl::llm::YCloudClient;
use revu_cl::{build_router, AppState, ClassifierConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("Starting revu-cl (Review Classification) service");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve configuration: ENV → TOML → defaults
    let config_path = revu_common::config::config_file_path();
    let toml_config = revu_common::config::load_toml_config(&config_path)?;
    let config = ClassifierConfig::resolve(&toml_config)?;

    let client = YCloudClient::new(&config.folder_id, config.api_key.clone(), &config.model)
        .map_err(|e| anyhow::anyhow!("Failed to create completion client: {}", e))?;
    tracing::info!(model_uri = %client.model_uri(), "Completion client initialized");

    let state = AppState::new(Arc::new(client), config.max_concurrency);
    let app = build_router(state);

    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", config.bind_port)).await?;
    tracing::info!("Listening on http://127.0.0.1:{}", config.bind_port);
    tracing::info!("Health check: http://127.0.0.1:{}/health", config.bind_port);

    axum::serve(listener, app).await?;

    Ok(())
}
