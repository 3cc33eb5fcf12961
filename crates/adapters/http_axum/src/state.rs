//! Shared application state for axum handlers.

use std::sync::Arc;

use serde::Serialize;

use tankhub_app::ports::{EventPublisher, EventSubscriber, TankRepository};
use tankhub_app::services::tank_service::TankService;

/// Broker connection settings reported to dashboard clients via
/// `GET /api/broker`, so they can subscribe to reading updates themselves.
#[derive(Debug, Clone, Serialize)]
pub struct BrokerSettings {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// Websocket port browsers use to reach the broker.
    pub broker_ws_port: u16,
    /// Topic carrying identifier → reading snapshot maps.
    pub data_topic: String,
}

/// Application state shared across all axum handlers.
///
/// Generic over the repository, event publisher, and event subscriber to
/// avoid dynamic dispatch. `Clone` is implemented manually so the
/// underlying types themselves do not need to be `Clone` — only the `Arc`
/// wrappers are cloned.
pub struct AppState<R, P, B> {
    /// Tank CRUD and measurement service.
    pub tank_service: Arc<TankService<R, P>>,
    /// Event bus handle for the SSE stream.
    pub events: Arc<B>,
    /// Broker settings reported to clients.
    pub broker: BrokerSettings,
}

impl<R, P, B> Clone for AppState<R, P, B> {
    fn clone(&self) -> Self {
        Self {
            tank_service: Arc::clone(&self.tank_service),
            events: Arc::clone(&self.events),
            broker: self.broker.clone(),
        }
    }
}

impl<R, P, B> AppState<R, P, B>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(tank_service: TankService<R, P>, events: B, broker: BrokerSettings) -> Self {
        Self {
            tank_service: Arc::new(tank_service),
            events: Arc::new(events),
            broker,
        }
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when services need to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(
        tank_service: Arc<TankService<R, P>>,
        events: Arc<B>,
        broker: BrokerSettings,
    ) -> Self {
        Self {
            tank_service,
            events,
            broker,
        }
    }
}
