//! Health check endpoint.
//!
//! Reports the worker's name and version plus the platform tag it stamps on
//! account rollups, so a deployment can be checked against its configuration.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Platform tag applied to account aggregates.
    pub platform: String,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "adinsight-worker",
        version: env!("CARGO_PKG_VERSION"),
        platform: state.service().config().platform.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use shared::config::InsightConfig;
    use shared::notify::InMemoryNotificationSink;
    use shared::storage::InMemoryInsightSource;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_configured_platform() {
        let state = AppState::new(
            InMemoryInsightSource::new_shared(),
            InMemoryNotificationSink::new_shared(),
            InsightConfig::new().with_platform("meta"),
        );

        let response = health_routes(state)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let health: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(health["status"], "healthy");
        assert_eq!(health["service"], "adinsight-worker");
        assert_eq!(health["platform"], "meta");
        assert!(health["version"].is_string());
    }
}
