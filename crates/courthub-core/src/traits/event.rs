//! Event publisher seam for fire-and-forget side effects.

use async_trait::async_trait;

use crate::events::DomainEvent;
use crate::result::AppResult;

/// Publishes domain events to downstream collaborators.
///
/// Callers publish after their transaction has committed and only log a
/// failure; a publisher error never invalidates the booking it describes.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish one event.
    async fn publish(&self, event: DomainEvent) -> AppResult<()>;
}
