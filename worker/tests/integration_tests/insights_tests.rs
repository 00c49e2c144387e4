//! Integration tests for the synchronous insight endpoint.

use axum::http::StatusCode;
use serde_json::json;
use shared::models::RawMetricRecord;

use super::common::{post_json, request_body, seed_example, sync_time, test_app, SHOP_ID};

#[tokio::test]
async fn test_insights_returns_report_without_publishing() {
    let app = test_app();
    seed_example(&app.source);

    let (status, report) = post_json(app.router, "/api/v1/insights", request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["account_id"], "x1");
    assert_eq!(report["clicks"], 20);
    assert_eq!(report["campaigns"][0]["campaign_id"], "C1");
    assert_eq!(report["campaigns"][0]["ad_groups"][0]["ad_group_id"], "G1");
    assert_eq!(app.sink.count().unwrap(), 0);
}

#[tokio::test]
async fn test_insights_ignores_other_accounts_and_instants() {
    let app = test_app();
    seed_example(&app.source);
    app.source
        .insert(
            SHOP_ID,
            sync_time(),
            RawMetricRecord::for_ad("B1", "H1", "D1", "x2").with_delivery(100, 1000),
        )
        .unwrap();
    app.source
        .insert(
            SHOP_ID,
            sync_time() + shared::chrono::Duration::days(1),
            RawMetricRecord::for_ad("A1", "G1", "C1", "x1").with_delivery(100, 1000),
        )
        .unwrap();
    app.source
        .insert(
            SHOP_ID + 1,
            sync_time(),
            RawMetricRecord::for_ad("A1", "G1", "C1", "x1").with_delivery(100, 1000),
        )
        .unwrap();

    let (status, report) = post_json(app.router, "/api/v1/insights", request_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["clicks"], 20);
    assert_eq!(report["campaigns"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_insights_selects_account_by_index() {
    let app = test_app();
    seed_example(&app.source);
    let mut body = request_body();
    body["acc"] = json!([{"id": "x0", "name": "Other"}, {"id": "x1", "name": "Main"}]);
    body["i_acc"] = json!(1);

    let (status, report) = post_json(app.router, "/api/v1/insights", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["account_id"], "x1");
    assert_eq!(report["clicks"], 20);
}

#[tokio::test]
async fn test_insights_missing_sync_time_is_bad_request() {
    let app = test_app();
    let mut body = request_body();
    body.as_object_mut().unwrap().remove("start_sync_time");

    let (status, response) = post_json(app.router, "/api/v1/insights", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_json");
}

#[tokio::test]
async fn test_insights_empty_account_list_is_bad_request() {
    let app = test_app();
    let mut body = request_body();
    body["acc"] = json!([]);

    let (status, response) = post_json(app.router, "/api/v1/insights", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_request");
}
