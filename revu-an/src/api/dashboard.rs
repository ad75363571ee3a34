//! Dashboard overview endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::models::{OverviewRequest, OverviewResponse};
use crate::services::DashboardService;
use crate::AppState;

/// POST /dashboard/overview
pub async fn overview(
    State(state): State<AppState>,
    Json(request): Json<OverviewRequest>,
) -> ApiResult<Json<OverviewResponse>> {
    if request.date_range.to < request.date_range.from {
        return Err(ApiError::BadRequest(
            "'to' date must be after or equal to 'from' date".to_string(),
        ));
    }

    tracing::info!(
        from = %request.date_range.from,
        to = %request.date_range.to,
        sources = request.filters.sources.len(),
        products = request.filters.products.len(),
        "Dashboard overview requested"
    );

    let service = DashboardService::new(state.db.clone());
    let response = service.overview(&request).await?;

    Ok(Json(response))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/dashboard/overview", post(overview))
}
