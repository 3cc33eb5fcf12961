//! Event bus port — publish/subscribe for domain events.

use std::future::Future;

use tokio::sync::broadcast;

use tankhub_domain::error::TankHubError;
use tankhub_domain::event::Event;

/// Publishes domain events to interested subscribers.
pub trait EventPublisher {
    /// Publish an event to all current subscribers.
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), TankHubError>> + Send;
}

impl<T: EventPublisher + Send + Sync> EventPublisher for std::sync::Arc<T> {
    fn publish(&self, event: Event) -> impl Future<Output = Result<(), TankHubError>> + Send {
        (**self).publish(event)
    }
}

/// Hands out receivers for the event stream (SSE handlers, republishing
/// sources).
pub trait EventSubscriber {
    /// Subscribe to events published after this call.
    fn subscribe(&self) -> broadcast::Receiver<Event>;
}

impl<T: EventSubscriber> EventSubscriber for std::sync::Arc<T> {
    fn subscribe(&self) -> broadcast::Receiver<Event> {
        (**self).subscribe()
    }
}
