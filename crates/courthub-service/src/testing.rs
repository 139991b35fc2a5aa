//! Shared fixtures for service tests: one venue with an exclusive cricket
//! field `A` and a cricket/football field `B`, hourly 06:00-22:00 at 500.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use courthub_core::config::BookingConfig;
use courthub_core::types::id::{
    DisabledSlotId, PriceRuleId, ResourceId, ServiceId, SlotConfigId, UserId,
};
use courthub_database::MemoryStore;
use courthub_entity::disabled_slot::DisabledSlot;
use courthub_entity::resource::Resource;
use courthub_entity::slot::{DayType, PriceRule, SlotConfig};
use courthub_entity::venue::Venue;

use crate::availability::{AvailabilityService, VenueClock};
use crate::booking::{BookingLifecycleService, BookingService, SoftLockService};
use crate::context::RequestContext;
use crate::events::EventBus;
use crate::slot_key::SlotKeyCodec;

pub(crate) fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub(crate) struct Fixture {
    pub store: MemoryStore,
    pub service_id: ServiceId,
    pub exclusive: ResourceId,
    pub shared: ResourceId,
    pub configs: [SlotConfigId; 2],
    pub codec: Arc<SlotKeyCodec>,
    pub bus: Arc<EventBus>,
    pub config: BookingConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let service_id = ServiceId::new();
        let created = Self::now() - Duration::days(30);
        store.add_venue(Venue {
            id: service_id,
            name: "Riverside Sports Park".into(),
            timezone: Some("UTC".into()),
            enabled: true,
            created_at: created,
        });

        let (exclusive, exclusive_config) =
            Self::add_field(&store, service_id, "Field A", &["CRICKET"], created);
        let (shared, shared_config) = Self::add_field(
            &store,
            service_id,
            "Field B",
            &["CRICKET", "FOOTBALL"],
            created + Duration::seconds(1),
        );

        let codec = SlotKeyCodec::new(&[7u8; 32], Duration::minutes(10)).unwrap();
        Self {
            store,
            service_id,
            exclusive,
            shared,
            configs: [exclusive_config, shared_config],
            codec: Arc::new(codec),
            bus: Arc::new(EventBus::new(64)),
            config: BookingConfig {
                platform_fee: dec!(20),
                ..BookingConfig::default()
            },
        }
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
            name: name.into(),
            activities: activities.iter().map(|a| a.to_string()).collect(),
            enabled: true,
            created_at,
            updated_at: created_at,
        });
        store.add_slot_config(SlotConfig {
            id: config_id,
            resource_id: id,
            opening_time: t(6, 0),
            closing_time: t(22, 0),
            slot_duration_minutes: 60,
            base_price: dec!(500),
            enabled: true,
            updated_at: created_at,
        });
        (id, config_id)
    }

    /// Pinned request clock: Wednesday 2026-10-14 08:00 UTC.
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap()
    }

    /// A Thursday after the pinned clock.
    pub fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    /// The Saturday after the pinned clock.
    pub fn weekend() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    /// Add the same price rule to both fields' configurations.
    pub fn add_rule(
        &self,
        day_type: DayType,
        hours: (u32, u32),
        override_price: Option<Decimal>,
        surcharge: Option<Decimal>,
        priority: i32,
    ) {
        for slot_config_id in self.configs {
            self.store.add_price_rule(PriceRule {
                id: PriceRuleId::new(),
                slot_config_id,
                day_type,
                start_time: t(hours.0, 0),
                end_time: t(hours.1, 0),
                override_price,
                surcharge,
                priority,
                enabled: true,
            });
        }
    }

    pub fn customer(&self) -> RequestContext {
        RequestContext::customer(UserId::new()).at(Self::now())
    }

    pub fn admin(&self) -> RequestContext {
        RequestContext::admin(Some(UserId::new())).at(Self::now())
    }

    fn clock(&self) -> VenueClock {
        VenueClock::new("UTC").unwrap()
    }

    pub fn availability(&self) -> AvailabilityService {
        AvailabilityService::new(Arc::new(self.store.clone()), Arc::clone(&self.codec), self.clock())
    }

    pub fn bookings(&self) -> BookingService {
        BookingService::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.bus.clone(),
            Arc::clone(&self.codec),
            self.config.clone(),
        )
    }

    pub fn soft_locks(&self) -> SoftLockService {
        SoftLockService::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.bus.clone(),
            self.clock(),
            self.config.clone(),
        )
    }

    pub fn lifecycle(&self) -> BookingLifecycleService {
        BookingLifecycleService::new(Arc::new(self.store.clone()), self.bus.clone())
    }

    /// Withdraw one hour of a resource on the fixture date.
    pub fn disable(&self, resource_id: ResourceId, hour: u32) {
        self.store.add_disabled_slot(DisabledSlot {
            id: DisabledSlotId::new(),
            resource_id,
            slot_date: Self::date(),
            start_time: t(hour, 0),
            end_time: t(hour + 1, 0),
            reason: Some("Maintenance".into()),
            created_by: None,
            created_at: Self::now(),
        });
    }

    /// Quote tomorrow's cricket slots and return the keys starting at the
    /// given hours, in order.
    pub async fn keys(&self, hours: &[u32]) -> Vec<String> {
        self.keys_on(Self::date(), hours).await
    }

    pub async fn keys_on(&self, date: NaiveDate, hours: &[u32]) -> Vec<String> {
        let quoted = self
            .availability()
            .quote(&RequestContext::anonymous().at(Self::now()), self.service_id, "cricket", date)
            .await
            .unwrap();
        hours
            .iter()
            .map(|h| {
                quoted
                    .iter()
                    .find(|q| q.start_time == t(*h, 0))
                    .and_then(|q| q.slot_key.clone())
                    .unwrap_or_else(|| panic!("no key for {h}:00"))
            })
            .collect()
    }
}
