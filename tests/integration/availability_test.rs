//! Integration tests for the availability listing.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

use helpers::{As, TestApp};

#[tokio::test]
async fn test_lists_every_slot_with_keys() {
    let app = TestApp::new();
    let response = app
        .request("GET", &app.availability_path(TestApp::date()), None, As::Anonymous)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    let slots = response.body["data"].as_array().unwrap();
    assert_eq!(slots.len(), 16);
    assert_eq!(slots[0]["start_time"], "06:00:00");
    assert_eq!(slots[0]["end_time"], "07:00:00");
    assert_eq!(slots[0]["total_count"], 2);
    assert_eq!(slots[0]["available_count"], 2);
    assert!(slots.iter().all(|s| s["slot_key"].is_string()));
}

#[tokio::test]
async fn test_booked_slot_counts_down() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[10]).await;
    let booked = app
        .request(
            "POST",
            "/api/bookings",
            Some(serde_json::json!({ "slot_keys": keys })),
            As::Admin,
        )
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{:?}", booked.body);

    let response = app
        .request("GET", &app.availability_path(TestApp::date()), None, As::Anonymous)
        .await;
    let ten = response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "10:00:00")
        .cloned()
        .unwrap();
    assert_eq!(ten["available_count"], 1);
    assert!(ten["slot_key"].is_string());
}

#[tokio::test]
async fn test_past_date_is_empty() {
    let app = TestApp::new();
    let past = TestApp::date() - Duration::days(7);
    let response = app
        .request("GET", &app.availability_path(past), None, As::Anonymous)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let app = TestApp::new();
    let path = format!(
        "/api/services/{}/availability?activity=cricket&date={}",
        uuid::Uuid::new_v4(),
        TestApp::date()
    );
    let response = app.request("GET", &path, None, As::Anonymous).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_activity_is_bad_request() {
    let app = TestApp::new();
    let path = format!(
        "/api/services/{}/availability?date={}",
        app.service_id.into_uuid(),
        TestApp::date()
    );
    let response = app.request("GET", &path, None, As::Anonymous).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_without_resources_conflicts() {
    let app = TestApp::new();
    let path = format!(
        "/api/services/{}/availability?activity=tennis&date={}",
        app.service_id.into_uuid(),
        TestApp::date()
    );
    let response = app.request("GET", &path, None, As::Anonymous).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "NO_RESOURCES_AVAILABLE");
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, As::Anonymous).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}
