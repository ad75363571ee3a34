//! revu-cl library interface
//!
//! Classification service: validates batches of customer reviews, fans
//! them out against an LLM completion endpoint under a bounded worker
//! pool, and assembles `{predictions, warnings}` responses. The axum
//! layer here is a thin adapter; the interesting parts live in
//! [`pipeline`] and [`llm`].

pub mod api;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod prompts;

pub use config::ClassifierConfig;

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use llm::CompletionGateway;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Completion backend used by the batch classifier
    pub gateway: Arc<dyn CompletionGateway>,
    /// Worker-pool bound per batch request
    pub max_concurrency: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn CompletionGateway>, max_concurrency: usize) -> Self {
        Self {
            gateway,
            max_concurrency,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
