//! Integration tests for the health endpoint.

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let app = test_app();

    let (status, response) = get(app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "adinsight-worker");
    assert_eq!(response["platform"], "pinterest");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = test_app();

    let (status, _) = get(app.router, "/api/v1/logs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
