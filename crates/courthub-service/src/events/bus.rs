//! Broadcast-channel event bus.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use courthub_core::events::DomainEvent;
use courthub_core::result::AppResult;
use courthub_core::traits::EventPublisher;

/// Fans domain events out to in-process subscribers (notification and
/// refund collaborators).
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish(&self, event: DomainEvent) -> AppResult<()> {
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "Published domain event"),
            Err(broadcast::error::SendError(event)) => {
                debug!(event_id = %event.id, "No subscribers for domain event");
            }
        }
        Ok(())
    }
}

/// Publish after commit; failures are logged and swallowed.
pub async fn publish_quietly(publisher: &dyn EventPublisher, event: DomainEvent) {
    let event_id = event.id;
    if let Err(e) = publisher.publish(event).await {
        warn!(event_id = %event_id, error = %e, "Failed to publish domain event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courthub_core::events::{BookingEvent, EventPayload};
    use courthub_core::types::id::BookingId;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let booking_id = BookingId::new();
        bus.publish(DomainEvent::booking(
            None,
            BookingEvent::Expired {
                booking_id,
                reference: "CH-ABCDEFGH".into(),
            },
        ))
        .await
        .unwrap();

        let received = rx.recv().await.unwrap();
        match received.payload {
            EventPayload::Booking(BookingEvent::Expired { booking_id: id, .. }) => {
                assert_eq!(id, booking_id)
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::default();
        let event = DomainEvent::booking(
            None,
            BookingEvent::Confirmed {
                booking_id: BookingId::new(),
                reference: "CH-ABCDEFGH".into(),
            },
        );
        assert!(bus.publish(event).await.is_ok());
    }
}
