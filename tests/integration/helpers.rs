//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use courthub_api::{AppState, build_app};
use courthub_core::config::AppConfig;
use courthub_core::types::id::{PriceRuleId, ResourceId, ServiceId, SlotConfigId};
use courthub_database::MemoryStore;
use courthub_entity::resource::Resource;
use courthub_entity::slot::{DayType, PriceRule, SlotConfig};
use courthub_entity::venue::Venue;

/// Who is calling.
#[derive(Debug, Clone, Copy)]
pub enum As {
    /// No identity headers.
    Anonymous,
    /// A customer with the given id.
    Customer(Uuid),
    /// An administrator.
    Admin,
}

impl As {
    /// A fresh customer identity.
    pub fn new_customer() -> Self {
        Self::Customer(Uuid::new_v4())
    }
}

/// Test application context over the in-memory store
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Store for direct inspection
    pub store: MemoryStore,
    /// The venue
    pub service_id: ServiceId,
    /// Cricket-only field
    pub field_a: ResourceId,
    /// Cricket and football field
    pub field_b: ResourceId,
    /// Slot configurations of both fields
    pub configs: [SlotConfigId; 2],
}

fn test_config() -> AppConfig {
    serde_json::from_value(serde_json::json!({
        "server": {},
        "database": { "url": "postgres://unused" },
        "booking": {
            "platform_fee": "20.00",
            "advance_percent": "20",
            "soft_lock_minutes": 10,
            "default_timezone": "UTC",
            "max_slots_per_booking": 8
        },
        "slot_key": {
            "secret": "Y291cnRodWItZGV2LXNsb3Qta2V5LTMyLWJ5dGVzISE=",
            "ttl_minutes": 10
        },
        "logging": {},
        "worker": { "enabled": false }
    }))
    .expect("Invalid test config")
}

fn add_field(
    store: &MemoryStore,
    service_id: ServiceId,
    name: &str,
    activities: &[&str],
    created_at: DateTime<Utc>,
) -> (ResourceId, SlotConfigId) {
    let id = ResourceId::new();
    let config_id = SlotConfigId::new();
    store.add_resource(Resource {
        id,
        service_id,
        name: name.to_string(),
        activities: activities.iter().map(|a| a.to_string()).collect(),
        enabled: true,
        created_at,
        updated_at: created_at,
    });
    store.add_slot_config(SlotConfig {
        id: config_id,
        resource_id: id,
        opening_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
        closing_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        slot_duration_minutes: 60,
        base_price: dec!(500),
        enabled: true,
        updated_at: created_at,
    });
    (id, config_id)
}

impl TestApp {
    /// Create a venue with two cricket fields and build the app
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let service_id = ServiceId::new();
        let created = Utc::now() - Duration::days(30);
        store.add_venue(Venue {
            id: service_id,
            name: "Test Sports Arena".to_string(),
            timezone: Some("UTC".to_string()),
            enabled: true,
            created_at: created,
        });
        let (field_a, config_a) = add_field(&store, service_id, "Field A", &["CRICKET"], created);
        let (field_b, config_b) = add_field(
            &store,
            service_id,
            "Field B",
            &["CRICKET", "FOOTBALL"],
            created + Duration::seconds(1),
        );

        let state = AppState::new(
            test_config(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
        )
        .expect("Failed to build app state");

        Self {
            router: build_app(state),
            store,
            service_id,
            field_a,
            field_b,
            configs: [config_a, config_b],
        }
    }

    /// Add the same price rule to both fields
    pub fn add_rule(
        &self,
        day_type: DayType,
        hours: (u32, u32),
        override_price: Option<Decimal>,
        surcharge: Option<Decimal>,
    ) {
        for slot_config_id in self.configs {
            self.store.add_price_rule(PriceRule {
                id: PriceRuleId::new(),
                slot_config_id,
                day_type,
                start_time: NaiveTime::from_hms_opt(hours.0, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(hours.1, 0, 0).unwrap(),
                override_price,
                surcharge,
                priority: 1,
                enabled: true,
            });
        }
    }

    /// A bookable day safely in the future
    pub fn date() -> NaiveDate {
        Utc::now().date_naive() + Duration::days(3)
    }

    /// The first Saturday after today
    pub fn next_saturday() -> NaiveDate {
        let today = Utc::now().date_naive();
        let ahead = match (12 - today.weekday().num_days_from_monday()) % 7 {
            0 => 7,
            n => n,
        };
        today + Duration::days(i64::from(ahead))
    }

    /// Availability path for cricket on `date`
    pub fn availability_path(&self, date: NaiveDate) -> String {
        format!(
            "/api/services/{}/availability?activity=cricket&date={date}",
            self.service_id.into_uuid()
        )
    }

    /// Quote and return the slot keys starting at the given hours
    pub async fn slot_keys(&self, hours: &[u32]) -> Vec<String> {
        self.slot_keys_on(Self::date(), hours).await
    }

    /// Quote `date` and return the slot keys starting at the given hours
    pub async fn slot_keys_on(&self, date: NaiveDate, hours: &[u32]) -> Vec<String> {
        let response = self
            .request("GET", &self.availability_path(date), None, As::Anonymous)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        let slots = response.body["data"].as_array().expect("slot list").clone();
        hours
            .iter()
            .map(|h| {
                let start = format!("{h:02}:00:00");
                slots
                    .iter()
                    .find(|s| s["start_time"] == start.as_str())
                    .and_then(|s| s["slot_key"].as_str())
                    .unwrap_or_else(|| panic!("No slot key for {start}"))
                    .to_string()
            })
            .collect()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        caller: As,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        req = match caller {
            As::Anonymous => req,
            As::Customer(id) => req
                .header("X-User-Id", id.to_string())
                .header("X-User-Role", "customer"),
            As::Admin => req.header("X-User-Role", "admin"),
        };

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .expect("Failed to read body")
            .to_bytes();

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
