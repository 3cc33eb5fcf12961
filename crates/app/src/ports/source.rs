//! Measurement source port — lifecycle for sensor ingestion adapters.
//!
//! A source bridges an external transport (MQTT, virtual/demo, …) into the
//! hub. It may register tanks on startup and feeds raw measurements
//! through the [`SourceContext`].

use std::future::Future;

use tankhub_domain::error::TankHubError;
use tankhub_domain::id::TankId;
use tankhub_domain::reading::TankReading;
use tankhub_domain::tank::Tank;

/// Context provided to sources for reaching the application core.
///
/// This is a **port** — adapters call it to register tanks and apply
/// measurements. The binary crate provides a concrete implementation
/// backed by `TankService`.
pub trait SourceContext: Send + Sync {
    /// Persist a tank definition (create, or update the configuration
    /// while preserving existing level data).
    fn upsert_tank(&self, tank: Tank) -> impl Future<Output = Result<Tank, TankHubError>> + Send;

    /// Apply a raw sensor measurement to the identified tank and return
    /// the fresh snapshot.
    fn apply_measurement(
        &self,
        id: &TankId,
        value: f64,
    ) -> impl Future<Output = Result<TankReading, TankHubError>> + Send;

    /// Snapshots of every tank, in stable order.
    fn snapshots(&self) -> impl Future<Output = Result<Vec<TankReading>, TankHubError>> + Send;

    /// Distinct sensor topics across all tanks.
    fn sensor_topics(&self) -> impl Future<Output = Result<Vec<String>, TankHubError>> + Send;
}

/// A pluggable measurement source.
///
/// Implementations live in adapter crates. The binary crate calls the
/// lifecycle methods in order:
///
/// 1. [`setup`](Self::setup) — initialise and register instantly-known tanks
/// 2. [`start_background`](Self::start_background) — spawn long-running tasks
/// 3. (the server runs; measurements flow through the context)
/// 4. [`teardown`](Self::teardown) — clean up connections and tasks
pub trait MeasurementSource {
    /// Unique name identifying this source (e.g. `"mqtt"`).
    fn name(&self) -> &'static str;

    /// Fast, non-blocking initialisation.
    ///
    /// Sources that know their tanks up front (virtual) register them via
    /// `ctx` here. Transport-backed sources should prepare their
    /// connection but **not** block waiting for traffic — do that in
    /// [`start_background`](Self::start_background) instead.
    fn setup(
        &mut self,
        ctx: &impl SourceContext,
    ) -> impl Future<Output = Result<(), TankHubError>> + Send;

    /// Start long-running ingestion.
    ///
    /// Spawns internal tasks that feed measurements via `ctx` and returns
    /// immediately. The default implementation is a no-op.
    fn start_background(
        &mut self,
        _ctx: impl SourceContext + Clone + 'static,
    ) -> impl Future<Output = Result<(), TankHubError>> + Send {
        async { Ok(()) }
    }

    /// Called on graceful shutdown. Clean up background tasks or
    /// connections.
    fn teardown(&mut self) -> impl Future<Output = Result<(), TankHubError>> + Send;
}
