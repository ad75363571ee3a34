//! revu-an library interface
//!
//! Analytics service: serves dashboard aggregates (metrics, trends,
//! sparklines, sentiment dynamics) over the relational review store the
//! classifier feeds.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod mappings;
pub mod models;
pub mod services;

pub use config::AnalyticsConfig;
pub use error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool) -> Self {
        Self {
            db,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::dashboard_routes())
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
