//! Synchronous insight endpoint.
//!
//! Computes the rollup for a request document and returns it directly,
//! without publishing a notification.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use shared::models::InsightRequest;
use shared::rollup::InsightReport;

use super::error::{ApiError, ErrorResponse};
use crate::state::AppState;

/// Creates the insight routes.
///
/// # Routes
///
/// - `POST /api/v1/insights` - Compute the rollup for one account
pub fn insights_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/insights", post(get_insights))
        .with_state(state)
}

async fn get_insights(
    State(state): State<AppState>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> Result<Json<InsightReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ErrorResponse::invalid_json(&rejection))?;

    let service = state.service();
    let report = tokio::task::spawn_blocking(move || service.get_insights(&request))
        .await
        .map_err(|e| ErrorResponse::from_join_error(&e))?
        .map_err(|e| ErrorResponse::from_insight_error(&e))?;

    Ok(Json(report))
}
