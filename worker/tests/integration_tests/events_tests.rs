//! Integration tests for queue delivery handling.
//!
//! Tests cover:
//! - Successful rollup and notification publishing
//! - Malformed and invalid deliveries
//! - Requests with no matching records

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{post_json, post_raw, queue_event, request_body, seed_example, test_app};

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn test_event_publishes_rollup() {
    let app = test_app();
    seed_example(&app.source);

    let (status, response) =
        post_json(app.router, "/api/v1/events", queue_event(&request_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message_id"], "shop:insights:insight-request");
    assert_eq!(response["campaigns"], 1);
    assert!(response["deduplication_id"].as_str().is_some_and(|id| !id.is_empty()));

    let delivered = app.sink.delivered().unwrap();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].shop_id, 42);
    assert_eq!(delivered[0].group_id, "shop:insights:insight-request");

    let notification: Value = serde_json::from_str(&delivered[0].body).unwrap();
    assert_eq!(notification["type"], "SA");
    assert_eq!(notification["topic"], "shop:insights");
    assert_eq!(notification["message"], "Success");
    assert_eq!(notification["subject"], "Get shop insights");
    assert_eq!(notification["message_attributes"]["requestID"], "insight-request");

    let account = &notification["message_attributes"]["data"];
    assert_eq!(account["account_id"], "x1");
    assert_eq!(account["platform"], "pinterest");
    assert_eq!(account["clicks"], 20);
    assert_eq!(account["impressions"], 200);
    assert_close(&account["spend"], 20.0);
    assert_close(&account["ctr"], 10.0);
    assert_close(&account["roas"], 2.5);
    assert_close(&account["cost_per_purchase"], 10.0);
    assert_close(&account["cost_per_atc"], 10.0);
    assert_close(&account["conversion_rate"], 10.0);

    let ads = &account["campaigns"][0]["ad_groups"][0]["ads"];
    assert_eq!(ads.as_array().unwrap().len(), 2);
    assert_eq!(ads[0]["ad_id"], "A1");
    assert_eq!(ads[0]["clicks"], 15);
    assert_close(&ads[0]["roas"], 2.0);
    assert_eq!(ads[1]["ad_id"], "A2");
}

#[tokio::test]
async fn test_event_request_id_sets_message_id() {
    let app = test_app();
    seed_example(&app.source);
    let mut body = request_body();
    body["request_id"] = json!("nightly-7");

    let (status, response) = post_json(app.router, "/api/v1/events", queue_event(&body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message_id"], "shop:insights:nightly-7");
}

#[tokio::test]
async fn test_event_without_records_publishes_empty_account() {
    let app = test_app();

    let (status, response) =
        post_json(app.router, "/api/v1/events", queue_event(&request_body())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["campaigns"], 0);

    let delivered = app.sink.delivered().unwrap();
    let notification: Value = serde_json::from_str(&delivered[0].body).unwrap();
    let account = &notification["message_attributes"]["data"];
    assert_eq!(account["account_id"], "x1");
    assert_eq!(account["account_name"], "Main");
    assert_eq!(account["clicks"], 0);
    assert_close(&account["roas"], 0.0);
}

#[tokio::test]
async fn test_event_with_two_messages_is_rejected() {
    let app = test_app();
    let body = request_body().to_string();
    let event = json!({
        "Records": [
            {"messageId": "m-1", "body": body},
            {"messageId": "m-2", "body": body}
        ]
    });

    let (status, response) = post_json(app.router, "/api/v1/events", event).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_request");
    assert_eq!(app.sink.count().unwrap(), 0);
}

#[tokio::test]
async fn test_event_with_malformed_body_is_rejected() {
    let app = test_app();
    let event = json!({"Records": [{"messageId": "m-1", "body": "{\"sid\": "}]});

    let (status, response) = post_json(app.router, "/api/v1/events", event).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_request");
}

#[tokio::test]
async fn test_event_with_account_index_out_of_range_is_rejected() {
    let app = test_app();
    let mut body = request_body();
    body["i_acc"] = json!(3);

    let (status, response) = post_json(app.router, "/api/v1/events", queue_event(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["message"].as_str().unwrap().contains("out of range"));
    assert_eq!(app.sink.count().unwrap(), 0);
}

#[tokio::test]
async fn test_event_invalid_json_is_rejected() {
    let app = test_app();

    let (status, response) = post_raw(app.router, "/api/v1/events", "[1, 2".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_json");
}
