//! Common test utilities and helpers for integration tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shared::chrono::{DateTime, TimeZone, Utc};
use shared::models::RawMetricRecord;
use shared::notify::InMemoryNotificationSink;
use shared::storage::InMemoryInsightSource;
use std::sync::Arc;
use worker::{create_router, AppState};

pub const SHOP_ID: i64 = 42;

/// A test router plus handles to its in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub source: Arc<InMemoryInsightSource>,
    pub sink: Arc<InMemoryNotificationSink>,
}

/// Creates a test router with a fresh, empty source and sink.
pub fn test_app() -> TestApp {
    let source = InMemoryInsightSource::new_shared();
    let sink = InMemoryNotificationSink::new_shared();
    let state = AppState::in_memory(Arc::clone(&source), Arc::clone(&sink));
    TestApp {
        router: create_router(state),
        source,
        sink,
    }
}

pub fn sync_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
}

/// Seeds the records of the two-ad, one-campaign example account `x1`.
pub fn seed_example(source: &InMemoryInsightSource) {
    source
        .insert_batch(
            SHOP_ID,
            sync_time(),
            vec![
                RawMetricRecord::for_ad("A1", "G1", "C1", "x1")
                    .with_delivery(10, 100)
                    .with_spend(5.0)
                    .with_add_to_cart(2.0),
                RawMetricRecord::for_ad("A1", "G1", "C1", "x1")
                    .with_delivery(5, 50)
                    .with_spend(5.0)
                    .with_purchases(1.0, 20.0),
                RawMetricRecord::for_ad("A2", "G1", "C1", "x1")
                    .with_delivery(5, 50)
                    .with_spend(10.0)
                    .with_purchases(1.0, 30.0),
            ],
        )
        .unwrap();
}

/// A request document for account `x1` of the test shop.
pub fn request_body() -> Value {
    json!({
        "sid": SHOP_ID,
        "cur": "USD",
        "acc": [{"id": "x1", "name": "Main", "cur": "USD", "tz": "UTC"}],
        "i_acc": 0,
        "progressive": false,
        "access_token": "secret-token",
        "consumer_id": 7,
        "name": "owner",
        "shop_name": "Shop",
        "start_sync_time": "2024-03-01T00:00:00Z",
        "platform": "pinterest"
    })
}

/// Wraps a request document in a single-message queue delivery.
pub fn queue_event(body: &Value) -> Value {
    json!({
        "Records": [{"messageId": "m-1", "body": body.to_string()}]
    })
}

/// Helper to make a POST request with JSON body.
pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(app, uri, serde_json::to_string(&body).unwrap()).await
}

/// Helper to make a POST request with an arbitrary body.
pub async fn post_raw(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a GET request.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
