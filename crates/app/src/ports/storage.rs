//! Storage port — repository trait for tank persistence.

use std::future::Future;

use tankhub_domain::error::TankHubError;
use tankhub_domain::id::TankId;
use tankhub_domain::tank::Tank;

/// Repository for persisting [`Tank`]s (configuration plus the level data
/// of the most recent measurement).
///
/// `get_all` must return tanks in insertion order — the dashboard relies
/// on a stable row order across refreshes.
pub trait TankRepository {
    /// Persist a new tank.
    fn create(&self, tank: Tank) -> impl Future<Output = Result<Tank, TankHubError>> + Send;

    /// Get a tank by its identifier.
    fn get_by_id(
        &self,
        id: &TankId,
    ) -> impl Future<Output = Result<Option<Tank>, TankHubError>> + Send;

    /// Get all tanks, in insertion order.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Tank>, TankHubError>> + Send;

    /// Replace a stored tank.
    fn update(&self, tank: Tank) -> impl Future<Output = Result<Tank, TankHubError>> + Send;

    /// Delete a tank by its identifier.
    fn delete(&self, id: &TankId) -> impl Future<Output = Result<(), TankHubError>> + Send;
}
