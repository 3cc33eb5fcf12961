//! Concrete [`SourceContext`] backed by the tank service.

use std::sync::Arc;

use tankhub_domain::error::TankHubError;
use tankhub_domain::id::TankId;
use tankhub_domain::reading::TankReading;
use tankhub_domain::tank::Tank;

use crate::ports::{EventPublisher, SourceContext, TankRepository};
use crate::services::tank_service::TankService;

/// [`SourceContext`] implementation that delegates to a shared
/// [`TankService`].
///
/// Wraps the `Arc`-ed service so it is cheaply cloneable and
/// `Send + Sync`. The generic parameters are confined to this struct —
/// sources see only the [`SourceContext`] trait.
pub struct ServiceContext<R, P> {
    tank_service: Arc<TankService<R, P>>,
}

impl<R, P> ServiceContext<R, P> {
    /// Create a new context backed by the given service.
    pub fn new(tank_service: Arc<TankService<R, P>>) -> Self {
        Self { tank_service }
    }
}

impl<R, P> Clone for ServiceContext<R, P> {
    fn clone(&self) -> Self {
        Self {
            tank_service: Arc::clone(&self.tank_service),
        }
    }
}

impl<R, P> SourceContext for ServiceContext<R, P>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
{
    async fn upsert_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
        self.tank_service.upsert_tank(tank).await
    }

    async fn apply_measurement(&self, id: &TankId, value: f64) -> Result<TankReading, TankHubError> {
        self.tank_service.apply_measurement(id, value).await
    }

    async fn snapshots(&self) -> Result<Vec<TankReading>, TankHubError> {
        self.tank_service.list_readings().await
    }

    async fn sensor_topics(&self) -> Result<Vec<String>, TankHubError> {
        self.tank_service.sensor_topics().await
    }
}
