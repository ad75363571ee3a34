//! Batch analysis endpoint
//!
//! Thin transport adapter in front of the classification pipeline: decode
//! the body, run the pipeline, serialize the outcome. Input problems and
//! per-review failures come back as warnings inside a 200 response; the
//! pipeline always returns a structured payload.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::Value;

use crate::pipeline::{BatchClassifier, BatchOutcome};
use crate::{prompts, AppState};

/// POST /analyze
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Json<BatchOutcome> {
    let item_count = body
        .get("data")
        .and_then(Value::as_array)
        .map(|data| data.len())
        .unwrap_or(0);
    tracing::info!(items = item_count, "Received analyze request");

    let classifier = BatchClassifier::new(state.gateway.clone(), state.max_concurrency);
    let outcome = classifier
        .classify_batch(&body, prompts::TOPICS_SENTIMENTS_PROMPT)
        .await;

    tracing::info!(
        predictions = outcome.predictions.len(),
        has_warnings = outcome.warnings.is_some(),
        "Analyze request completed"
    );

    Json(outcome)
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze))
}
