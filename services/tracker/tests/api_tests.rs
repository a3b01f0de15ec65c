//! Integration tests for the REST router.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use tracker_lib::adapters::{FixedClock, InMemoryStore};
use tracker_lib::config::Config;
use tracker_lib::web::{router, state::AppState};

fn app() -> Router {
    let config = Arc::new(Config::from_lookup(|_| None).unwrap());
    // Midday UTC falls on the same date in the local zone of any test machine.
    let now = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
    let state = AppState::new(config, Arc::new(InMemoryStore::new()), Arc::new(FixedClock(now)));
    router(Arc::new(state)).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        })
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

#[tokio::test]
async fn test_stats_on_empty_store() {
    let app = app();
    let (status, body) = send(&app, "GET", "/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["today_pages"], 0);
    assert_eq!(body["streak"]["current_streak"], 0);
    assert_eq!(body["streak"]["last_reading_date"], Value::Null);
    assert_eq!(body["weekly"].as_array().unwrap().len(), 7);
    assert_eq!(body["weekly"][6]["date"], "2024-05-15");
    assert_eq!(body["weekly"][6]["label"], "MER");
    assert_eq!(body["chart_scale"], 10);
}

#[tokio::test]
async fn test_book_and_session_flow() {
    let app = app();

    let (status, book) = send(
        &app,
        "POST",
        "/books",
        Some(json!({ "title": "Dune", "total_pages": 400 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let book_id = book["id"].as_str().unwrap().to_string();

    let (status, event) = send(
        &app,
        "POST",
        "/events",
        Some(json!({ "pages": 100, "book_id": book_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["pages"], 100);

    let (_, books) = send(&app, "GET", "/books", None).await;
    assert_eq!(books["books"][0]["pages_read"], 100);
    assert_eq!(books["books"][0]["progress"], 0.25);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["today_pages"], 100);
    assert_eq!(stats["streak"]["current_streak"], 1);
    assert_eq!(stats["streak"]["is_streak_active_today"], true);
    assert_eq!(stats["chart_scale"], 100);

    let (status, _) = send(&app, "DELETE", &format!("/books/{}", book_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, events) = send(&app, "GET", "/events", None).await;
    assert!(events["events"].as_array().unwrap().is_empty());
    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["today_pages"], 0);
}

#[tokio::test]
async fn test_error_statuses() {
    let app = app();

    let (status, _) = send(&app, "POST", "/books", Some(json!({ "title": "", "total_pages": 10 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/events", Some(json!({ "pages": -4 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/events", Some(json!({ "pages": 4, "book_id": "ghost" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/books/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
