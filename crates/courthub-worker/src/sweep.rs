//! Soft-lock expiry sweep.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use courthub_core::AppResult;
use courthub_core::events::{BookingEvent, DomainEvent};
use courthub_core::traits::EventPublisher;
use courthub_database::BookingStore;
use courthub_service::events::publish_quietly;

/// Moves lapsed `PAYMENT_PENDING` bookings to `EXPIRED`.
///
/// Availability never depends on this sweep having run: a lapsed lock
/// stops blocking as soon as its deadline passes. The sweep only makes the
/// status explicit and notifies collaborators.
pub struct LockExpirySweep {
    store: Arc<dyn BookingStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl std::fmt::Debug for LockExpirySweep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockExpirySweep").finish_non_exhaustive()
    }
}

impl LockExpirySweep {
    /// Create a new sweep
    pub fn new(store: Arc<dyn BookingStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { store, publisher }
    }

    /// Expire every lock whose deadline is at or before `now`. Returns the
    /// number of bookings expired.
    pub async fn run_once(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let expired = self.store.expire_soft_locks(now).await?;
        for booking in &expired {
            publish_quietly(
                self.publisher.as_ref(),
                DomainEvent::booking(
                    None,
                    BookingEvent::Expired {
                        booking_id: booking.id,
                        reference: booking.reference.clone(),
                    },
                ),
            )
            .await;
        }

        if expired.is_empty() {
            tracing::debug!("No soft locks lapsed");
        } else {
            tracing::info!(count = expired.len(), "Expired lapsed soft locks");
        }
        Ok(expired.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate, NaiveTime, TimeZone};
    use rust_decimal::Decimal;

    use courthub_core::events::EventPayload;
    use courthub_core::types::id::{BookingId, ResourceId, ServiceId, UserId};
    use courthub_database::MemoryStore;
    use courthub_entity::booking::{Booking, BookingStatus, PaymentMode, PaymentProgress};

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<DomainEvent>>,
    }

    #[async_trait]
    impl EventPublisher for Recorder {
        async fn publish(&self, event: DomainEvent) -> AppResult<()> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
    }

    fn hold(reference: &str, status: BookingStatus, expires_in: i64) -> Booking {
        let created = now() - Duration::minutes(15);
        Booking {
            id: BookingId::new(),
            reference: reference.into(),
            resource_id: Some(ResourceId::new()),
            user_id: Some(UserId::new()),
            service_id: ServiceId::new(),
            activity_code: "CRICKET".into(),
            booking_date: NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            total_amount: Decimal::new(52000, 2),
            online_amount: Decimal::new(52000, 2),
            venue_amount: Decimal::ZERO,
            platform_fee: Decimal::new(2000, 2),
            status,
            payment_progress: PaymentProgress::NotStarted,
            payment_mode: PaymentMode::Online,
            idempotency_key: None,
            parent_idempotency_key: None,
            client_request_id: None,
            split_group_id: None,
            lock_expires_at: Some(now() + Duration::minutes(expires_in)),
            cancellation_reason: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[tokio::test]
    async fn test_sweep_expires_only_lapsed_holds() {
        let store = MemoryStore::new();
        store.add_booking(hold("CH-LAPSED01", BookingStatus::PaymentPending, -1));
        store.add_booking(hold("CH-ATNOW001", BookingStatus::PaymentPending, 0));
        store.add_booking(hold("CH-LIVE0001", BookingStatus::PaymentPending, 5));
        store.add_booking(hold("CH-CONFIRM1", BookingStatus::Confirmed, -30));

        let recorder = Arc::new(Recorder::default());
        let sweep = LockExpirySweep::new(Arc::new(store.clone()), recorder.clone());
        assert_eq!(sweep.run_once(now()).await.unwrap(), 2);

        let statuses: Vec<(String, BookingStatus)> = store
            .bookings()
            .into_iter()
            .map(|b| (b.reference, b.status))
            .collect();
        assert!(statuses.contains(&("CH-LAPSED01".into(), BookingStatus::Expired)));
        assert!(statuses.contains(&("CH-ATNOW001".into(), BookingStatus::Expired)));
        assert!(statuses.contains(&("CH-LIVE0001".into(), BookingStatus::PaymentPending)));
        assert!(statuses.contains(&("CH-CONFIRM1".into(), BookingStatus::Confirmed)));

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| matches!(
            e.payload,
            EventPayload::Booking(BookingEvent::Expired { .. })
        )));
    }

    #[tokio::test]
    async fn test_second_sweep_is_a_no_op() {
        let store = MemoryStore::new();
        store.add_booking(hold("CH-LAPSED02", BookingStatus::PaymentPending, -3));
        let sweep = LockExpirySweep::new(Arc::new(store), Arc::new(Recorder::default()));
        assert_eq!(sweep.run_once(now()).await.unwrap(), 1);
        assert_eq!(sweep.run_once(now()).await.unwrap(), 0);
    }
}
