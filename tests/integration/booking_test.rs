//! Integration tests for booking creation, soft locks, and lifecycle.

mod helpers;

use axum::http::StatusCode;
use courthub_entity::slot::DayType;
use rust_decimal_macros::dec;
use serde_json::json;

use helpers::{As, TestApp};

#[tokio::test]
async fn test_booking_prefers_exclusive_field_then_falls_back() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[10, 11]).await;

    let owner = As::new_customer();

    let first = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), owner)
        .await;
    assert_eq!(first.status, StatusCode::CREATED, "{:?}", first.body);
    let booking = &first.body["data"]["booking"];
    assert_eq!(first.body["data"]["result"], "BOOKED");
    assert_eq!(booking["resource_id"], app.field_a.into_uuid().to_string());
    assert_eq!(booking["start_time"], "10:00:00");
    assert_eq!(booking["end_time"], "12:00:00");
    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["total_amount"], "1020.00");
    assert_eq!(booking["online_amount"], "204.00");
    assert_eq!(booking["venue_amount"], "816.00");

    // An unpaid booking does not hold the field until payment starts.
    let started = app
        .request(
            "POST",
            &format!("/api/bookings/{}/payment-started", booking["id"].as_str().unwrap()),
            None,
            owner,
        )
        .await;
    assert_eq!(started.status, StatusCode::OK, "{:?}", started.body);

    let second = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(
        second.body["data"]["booking"]["resource_id"],
        app.field_b.into_uuid().to_string()
    );
}

#[tokio::test]
async fn test_both_fields_locked_is_conflict() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[18]).await;
    for _ in 0..2 {
        let response = app
            .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::Admin)
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let response = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["code"], "NO_AVAILABLE_RESOURCES");
}

#[tokio::test]
async fn test_gap_between_keys_is_rejected() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[9, 11]).await;
    let response = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "SLOTS_NOT_CONTIGUOUS");
    assert!(app.store.bookings().is_empty());
}

#[tokio::test]
async fn test_tampered_key_is_rejected() {
    let app = TestApp::new();
    let mut keys = app.slot_keys(&[9]).await;
    keys[0].replace_range(0..4, "AAAA");
    let response = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVALID_SLOT_KEY");
}

#[tokio::test]
async fn test_idempotency_key_replays_original() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[14]).await;
    let caller = As::new_customer();
    let body = json!({ "slot_keys": keys, "idempotency_key": "order-42" });

    let first = app.request("POST", "/api/bookings", Some(body.clone()), caller).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let again = app.request("POST", "/api/bookings", Some(body), caller).await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["replayed"], true);
    assert_eq!(
        again.body["data"]["booking"]["id"],
        first.body["data"]["booking"]["id"]
    );
    assert_eq!(app.store.bookings().len(), 1);
}

#[tokio::test]
async fn test_idempotency_key_of_another_customer_conflicts() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[13]).await;
    let body = json!({ "slot_keys": keys, "idempotency_key": "order-7" });

    let first = app.request("POST", "/api/bookings", Some(body.clone()), As::new_customer()).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let other = app.request("POST", "/api/bookings", Some(body), As::new_customer()).await;
    assert_eq!(other.status, StatusCode::CONFLICT);
    assert_eq!(other.body["code"], "DUPLICATE_IDEMPOTENCY_KEY");
    assert!(other.body["data"].is_null());
    assert_eq!(app.store.bookings().len(), 1);
}

#[tokio::test]
async fn test_second_payment_start_on_shared_range_conflicts() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[17]).await;
    let (alice, bob) = (As::new_customer(), As::new_customer());
    let mut ids = Vec::new();
    for caller in [alice, bob] {
        let created = app
            .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), caller)
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(
            created.body["data"]["booking"]["resource_id"],
            app.field_a.into_uuid().to_string()
        );
        ids.push(created.body["data"]["booking"]["id"].as_str().unwrap().to_string());
    }

    let path = |id: &str| format!("/api/bookings/{id}/payment-started");
    assert_eq!(app.request("POST", &path(&ids[0]), None, alice).await.status, StatusCode::OK);
    let late = app.request("POST", &path(&ids[1]), None, bob).await;
    assert_eq!(late.status, StatusCode::CONFLICT);
    assert_eq!(late.body["code"], "NO_AVAILABLE_RESOURCES");
}

#[tokio::test]
async fn test_price_rules_drive_quote_and_booking_total() {
    let app = TestApp::new();
    app.add_rule(DayType::All, (11, 12), Some(dec!(700)), Some(dec!(50)));
    app.add_rule(DayType::Weekend, (18, 22), None, Some(dec!(100)));

    let quoted = app
        .request("GET", &app.availability_path(TestApp::date()), None, As::Anonymous)
        .await;
    let eleven = quoted.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["start_time"] == "11:00:00")
        .cloned()
        .unwrap();
    assert_eq!(eleven["price"], "750.00");

    let keys = app.slot_keys(&[10, 11]).await;
    let booked = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{:?}", booked.body);
    assert_eq!(booked.body["data"]["booking"]["total_amount"], "1270.00");

    let saturday = TestApp::next_saturday();
    let keys = app.slot_keys_on(saturday, &[19]).await;
    let booked = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(booked.status, StatusCode::CREATED, "{:?}", booked.body);
    assert_eq!(booked.body["data"]["booking"]["booking_date"], saturday.to_string());
    assert_eq!(booked.body["data"]["booking"]["total_amount"], "620.00");
}

#[tokio::test]
async fn test_partial_availability_then_split() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[15, 16]).await;

    // Leave field A taken at 15:00 and field B taken at 16:00.
    let sixteen = app.slot_keys(&[16]).await;
    let on_a = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": sixteen })), As::Admin)
        .await;
    let on_b = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": sixteen })), As::Admin)
        .await;
    assert_eq!(on_b.body["data"]["booking"]["resource_id"], app.field_b.into_uuid().to_string());
    let cancel_path = format!(
        "/api/bookings/{}/cancel",
        on_a.body["data"]["booking"]["id"].as_str().unwrap()
    );
    let cancelled = app.request("POST", &cancel_path, None, As::Admin).await;
    assert_eq!(cancelled.status, StatusCode::OK);
    assert_eq!(cancelled.body["data"]["status"], "CANCELLED");
    let fifteen = app.slot_keys(&[15]).await;
    let on_a = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": fifteen })), As::Admin)
        .await;
    assert_eq!(on_a.body["data"]["booking"]["resource_id"], app.field_a.into_uuid().to_string());

    let response = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::new_customer())
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["result"], "PARTIAL_AVAILABLE");
    assert_eq!(response.body["data"]["slots"].as_array().map(Vec::len), Some(2));

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({ "slot_keys": keys, "allow_split": true, "idempotency_key": "split-1" })),
            As::new_customer(),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["data"]["result"], "SPLIT");
    let children = response.body["data"]["bookings"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    // Platform fee is charged on every split child.
    assert!(children.iter().all(|c| c["platform_fee"] == "20.00"));
    assert!(children.iter().all(|c| c["total_amount"] == "520.00"));
    assert_eq!(children[0]["resource_id"], app.field_b.into_uuid().to_string());
    assert_eq!(children[1]["resource_id"], app.field_a.into_uuid().to_string());
}

#[tokio::test]
async fn test_soft_lock_and_resume() {
    let app = TestApp::new();
    let caller = As::new_customer();
    let body = json!({
        "service_id": app.service_id.into_uuid(),
        "activity_code": "cricket",
        "date": TestApp::date(),
        "start_time": "19:00:00",
        "end_time": "21:00:00",
        "client_request_id": "checkout-tab"
    });

    let first = app
        .request("POST", "/api/bookings/soft-lock", Some(body.clone()), caller)
        .await;
    assert_eq!(first.status, StatusCode::CREATED, "{:?}", first.body);
    let booking = &first.body["data"]["booking"];
    assert_eq!(booking["status"], "PAYMENT_PENDING");
    let remaining = booking["lock_seconds_remaining"].as_i64().unwrap();
    assert!((595..=600).contains(&remaining));

    let again = app
        .request("POST", "/api/bookings/soft-lock", Some(body), caller)
        .await;
    assert_eq!(again.status, StatusCode::OK);
    assert_eq!(again.body["data"]["resumed"], true);
    assert_eq!(again.body["data"]["booking"]["id"], booking["id"]);
    assert_eq!(
        again.body["data"]["booking"]["lock_expires_at"],
        booking["lock_expires_at"]
    );
    assert_eq!(app.store.bookings().len(), 1);
}

#[tokio::test]
async fn test_misaligned_soft_lock_rejected() {
    let app = TestApp::new();
    let body = json!({
        "service_id": app.service_id.into_uuid(),
        "activity_code": "CRICKET",
        "date": TestApp::date(),
        "start_time": "10:30:00",
        "end_time": "11:30:00"
    });
    let response = app
        .request("POST", "/api/bookings/soft-lock", Some(body), As::new_customer())
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "MISALIGNED_RANGE");
}

#[tokio::test]
async fn test_lookup_is_restricted_to_owner_and_admin() {
    let app = TestApp::new();
    let owner = As::new_customer();
    let keys = app.slot_keys(&[7]).await;
    let created = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), owner)
        .await;
    let reference = created.body["data"]["booking"]["reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("CH-"));
    let path = format!("/api/bookings/{reference}");

    assert_eq!(app.request("GET", &path, None, owner).await.status, StatusCode::OK);
    assert_eq!(app.request("GET", &path, None, As::Admin).await.status, StatusCode::OK);
    assert_eq!(
        app.request("GET", &path, None, As::new_customer()).await.status,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        app.request("GET", "/api/bookings/CH-NOTFOUND", None, As::Admin).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_payment_confirm_complete_flow() {
    let app = TestApp::new();
    let owner = As::new_customer();
    let keys = app.slot_keys(&[12]).await;
    let created = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), owner)
        .await;
    let id = created.body["data"]["booking"]["id"].as_str().unwrap().to_string();

    let started = app
        .request("POST", &format!("/api/bookings/{id}/payment-started"), None, owner)
        .await;
    assert_eq!(started.status, StatusCode::OK);
    assert_eq!(started.body["data"]["payment_progress"], "IN_PROGRESS");

    let denied = app
        .request("POST", &format!("/api/bookings/{id}/confirm"), None, owner)
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let confirmed = app
        .request("POST", &format!("/api/bookings/{id}/confirm"), None, As::Admin)
        .await;
    assert_eq!(confirmed.status, StatusCode::OK);
    assert_eq!(confirmed.body["data"]["status"], "CONFIRMED");

    let completed = app
        .request("POST", &format!("/api/bookings/{id}/complete"), None, As::Admin)
        .await;
    assert_eq!(completed.body["data"]["status"], "COMPLETED");

    let cancel = app
        .request(
            "POST",
            &format!("/api/bookings/{id}/cancel"),
            Some(json!({ "reason": "too late" })),
            owner,
        )
        .await;
    assert_eq!(cancel.status, StatusCode::CONFLICT);
    assert_eq!(cancel.body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_customer_without_identity_cannot_book() {
    let app = TestApp::new();
    let keys = app.slot_keys(&[8]).await;
    let response = app
        .request("POST", "/api/bookings", Some(json!({ "slot_keys": keys })), As::Anonymous)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(app.store.bookings().is_empty());
}
