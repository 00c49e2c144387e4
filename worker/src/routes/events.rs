//! Queue delivery endpoint.
//!
//! Accepts the queue's delivery document, computes the requested account's
//! rollup and publishes it as an in-app notification.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::models::QueueEvent;

use super::error::{ApiError, ErrorResponse};
use crate::state::AppState;

/// Response for a published rollup.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventResponse {
    /// Message id the notification was grouped under.
    pub message_id: String,
    /// Deduplication token of this delivery.
    pub deduplication_id: String,
    /// Number of campaigns in the published report.
    pub campaigns: usize,
}

/// Creates the queue delivery routes.
///
/// # Routes
///
/// - `POST /api/v1/events` - Handle one queue delivery
pub fn events_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/events", post(handle_event))
        .with_state(state)
}

async fn handle_event(
    State(state): State<AppState>,
    payload: Result<Json<QueueEvent>, JsonRejection>,
) -> Result<Json<EventResponse>, ApiError> {
    let Json(event) = payload.map_err(|rejection| ErrorResponse::invalid_json(&rejection))?;

    let service = state.service();
    let delivery = tokio::task::spawn_blocking(move || service.handle_event(&event))
        .await
        .map_err(|e| ErrorResponse::from_join_error(&e))?
        .map_err(|e| ErrorResponse::from_insight_error(&e))?;

    Ok(Json(EventResponse {
        message_id: delivery.message_id,
        deduplication_id: delivery.deduplication_id,
        campaigns: delivery.report.account().campaigns.len(),
    }))
}
