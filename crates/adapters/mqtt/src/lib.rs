//! # tankhub-adapter-mqtt
//!
//! MQTT measurement source — bridges tank level sensors into tankhub via
//! [rumqttc](https://docs.rs/rumqttc).
//!
//! ## Message flow
//! - Subscribes to every tank's sensor topic plus the data-request topic.
//! - Sensor payloads are JSON `{"id": "...", "measurement": 1.2}` or a
//!   list of such objects; each one is applied through the source context,
//!   one message at a time.
//! - After a successful update (and on any data request) the full
//!   identifier → reading snapshot map is published, retained, on the
//!   data topic, so late subscribers get the current picture immediately.
//! - Malformed payloads are logged and dropped; the event loop keeps
//!   going and later messages are unaffected.
//!
//! ## Dependency rule
//! Depends on `tankhub-app` (port traits) and `tankhub-domain` only.

mod config;
mod error;

pub use config::MqttConfig;
pub use error::MqttError;

use std::collections::BTreeMap;
use std::time::Duration;

use rumqttc::{AsyncClient, Event as MqttEvent, EventLoop, MqttOptions, Packet, QoS};
use serde::Deserialize;
use tokio::task::JoinHandle;

use tankhub_app::ports::{MeasurementSource, SourceContext};
use tankhub_domain::error::TankHubError;
use tankhub_domain::id::TankId;
use tankhub_domain::reading::TankReading;

/// Delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One sensor report: which tank, and the raw measured value.
#[derive(Debug, Deserialize)]
struct SensorMessage {
    id: TankId,
    measurement: f64,
}

/// Sensors may publish a single report or a batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SensorPayload {
    Single(SensorMessage),
    Batch(Vec<SensorMessage>),
}

impl SensorPayload {
    fn into_messages(self) -> Vec<SensorMessage> {
        match self {
            Self::Single(message) => vec![message],
            Self::Batch(batch) => batch,
        }
    }
}

/// MQTT-backed measurement source.
///
/// Owns its broker connection: the client lives inside this struct and the
/// event loop is handed to a single background task on start, so inbound
/// messages are processed to completion one at a time.
pub struct MqttSource {
    config: MqttConfig,
    client: Option<AsyncClient>,
    event_loop: Option<EventLoop>,
    task: Option<JoinHandle<()>>,
}

impl MqttSource {
    /// Create a new source for the given configuration. Nothing connects
    /// until [`setup`](MeasurementSource::setup) is called.
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            client: None,
            event_loop: None,
            task: None,
        }
    }
}

impl MeasurementSource for MqttSource {
    fn name(&self) -> &'static str {
        "mqtt"
    }

    async fn setup(&mut self, _ctx: &impl SourceContext) -> Result<(), TankHubError> {
        // A random suffix keeps client ids unique across restarts while the
        // broker may still hold the previous session.
        let client_id = format!(
            "{}_{}",
            self.config.client_id,
            uuid::Uuid::new_v4().simple()
        );
        let mut options = MqttOptions::new(
            client_id,
            &self.config.broker_host,
            self.config.broker_port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.config.keep_alive_secs)));

        let (client, event_loop) = AsyncClient::new(options, 64);
        self.client = Some(client);
        self.event_loop = Some(event_loop);
        Ok(())
    }

    async fn start_background(
        &mut self,
        ctx: impl SourceContext + Clone + 'static,
    ) -> Result<(), TankHubError> {
        let client = self.client.clone().ok_or(MqttError::NotConnected)?;
        let mut event_loop = self.event_loop.take().ok_or(MqttError::NotConnected)?;
        let config = self.config.clone();

        let handle = tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(MqttEvent::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!(broker = %config.broker_host, "connected to mqtt broker");
                        if let Err(err) = subscribe_topics(&client, &config, &ctx).await {
                            tracing::warn!(error = %err, "failed to subscribe after connect");
                        }
                    }
                    Ok(MqttEvent::Incoming(Packet::Publish(publish))) => {
                        handle_publish(&client, &config, &ctx, &publish.topic, &publish.payload)
                            .await;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "mqtt connection error, retrying");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });
        self.task = Some(handle);
        Ok(())
    }

    async fn teardown(&mut self) -> Result<(), TankHubError> {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        if let Some(client) = self.client.take() {
            if let Err(err) = client.disconnect().await {
                tracing::debug!(error = %err, "mqtt disconnect failed");
            }
        }
        self.event_loop = None;
        Ok(())
    }
}

/// Subscribe to every distinct sensor topic plus the data-request topic.
async fn subscribe_topics(
    client: &AsyncClient,
    config: &MqttConfig,
    ctx: &impl SourceContext,
) -> Result<(), TankHubError> {
    for topic in ctx.sensor_topics().await? {
        tracing::debug!(%topic, "subscribing to sensor topic");
        client
            .subscribe(topic, QoS::AtMostOnce)
            .await
            .map_err(MqttError::Client)?;
    }
    client
        .subscribe(config.request_topic.as_str(), QoS::AtMostOnce)
        .await
        .map_err(MqttError::Client)?;
    Ok(())
}

/// Handle one inbound publish packet to completion.
async fn handle_publish(
    client: &AsyncClient,
    config: &MqttConfig,
    ctx: &impl SourceContext,
    topic: &str,
    payload: &[u8],
) {
    if topic == config.request_topic {
        if let Err(err) = publish_snapshots(client, config, ctx).await {
            tracing::warn!(error = %err, "failed to answer data request");
        }
        return;
    }

    if apply_payload(ctx, payload).await {
        if let Err(err) = publish_snapshots(client, config, ctx).await {
            tracing::warn!(error = %err, "failed to publish updated snapshots");
        }
    }
}

/// Decode a sensor payload and apply every contained measurement.
///
/// Returns whether at least one tank was updated. A malformed payload is
/// logged and discarded — the display simply does not update for this
/// message, and later messages are unaffected.
async fn apply_payload(ctx: &impl SourceContext, payload: &[u8]) -> bool {
    let messages = match serde_json::from_slice::<SensorPayload>(payload) {
        Ok(payload) => payload.into_messages(),
        Err(err) => {
            tracing::warn!(error = %err, "could not decode sensor payload, dropping");
            return false;
        }
    };

    let mut updated = false;
    for message in messages {
        match ctx.apply_measurement(&message.id, message.measurement).await {
            Ok(reading) => {
                updated = true;
                tracing::debug!(
                    tank_id = %message.id,
                    percentage = ?reading.percentage,
                    sensor_error = reading.sensor_error,
                    "applied measurement"
                );
            }
            Err(err) => {
                tracing::warn!(tank_id = %message.id, error = %err, "measurement rejected");
            }
        }
    }
    updated
}

/// Publish the full identifier → reading map, retained, on the data topic.
async fn publish_snapshots(
    client: &AsyncClient,
    config: &MqttConfig,
    ctx: &impl SourceContext,
) -> Result<(), TankHubError> {
    let snapshots: BTreeMap<TankId, TankReading> = ctx
        .snapshots()
        .await?
        .into_iter()
        .map(|reading| (reading.id.clone(), reading))
        .collect();
    let payload = serde_json::to_vec(&snapshots).map_err(MqttError::PayloadEncode)?;
    client
        .publish(config.data_topic.as_str(), QoS::AtLeastOnce, true, payload)
        .await
        .map_err(MqttError::Client)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tankhub_domain::tank::Tank;

    #[derive(Default, Clone)]
    struct RecordingContext {
        applied: Arc<Mutex<Vec<(TankId, f64)>>>,
    }

    impl SourceContext for RecordingContext {
        async fn upsert_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
            Ok(tank)
        }

        async fn apply_measurement(
            &self,
            id: &TankId,
            value: f64,
        ) -> Result<TankReading, TankHubError> {
            if id.as_str() == "unknown" {
                return Err(tankhub_domain::error::NotFoundError {
                    entity: "Tank",
                    id: id.to_string(),
                }
                .into());
            }
            self.applied.lock().unwrap().push((id.clone(), value));
            Ok(TankReading::builder().id(id.clone()).label("Tank").build())
        }

        async fn snapshots(&self) -> Result<Vec<TankReading>, TankHubError> {
            Ok(vec![])
        }

        async fn sensor_topics(&self) -> Result<Vec<String>, TankHubError> {
            Ok(vec!["WATER_TANK_MEASUREMENT".to_string()])
        }
    }

    #[tokio::test]
    async fn should_apply_single_sensor_message() {
        let ctx = RecordingContext::default();
        let payload = br#"{"id": "water_tank_1", "measurement": 0.5}"#;

        assert!(apply_payload(&ctx, payload).await);

        let applied = ctx.applied.lock().unwrap();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0.as_str(), "water_tank_1");
        assert!((applied[0].1 - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn should_apply_batch_of_sensor_messages() {
        let ctx = RecordingContext::default();
        let payload = br#"[
            {"id": "water_tank_1", "measurement": 0.5},
            {"id": "water_tank_2", "measurement": 1.2}
        ]"#;

        assert!(apply_payload(&ctx, payload).await);
        assert_eq!(ctx.applied.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_drop_malformed_payload() {
        let ctx = RecordingContext::default();

        assert!(!apply_payload(&ctx, b"not json at all").await);
        assert!(!apply_payload(&ctx, br#"{"id": "water_tank_1"}"#).await);
        assert!(ctx.applied.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_keep_applying_after_malformed_payload() {
        let ctx = RecordingContext::default();

        assert!(!apply_payload(&ctx, b"{{broken").await);
        assert!(apply_payload(&ctx, br#"{"id": "water_tank_1", "measurement": 0.5}"#).await);
        assert_eq!(ctx.applied.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_report_no_update_when_tank_unknown() {
        let ctx = RecordingContext::default();
        let payload = br#"{"id": "unknown", "measurement": 0.5}"#;

        assert!(!apply_payload(&ctx, payload).await);
    }

    #[tokio::test]
    async fn should_count_partial_batch_success_as_update() {
        let ctx = RecordingContext::default();
        let payload = br#"[
            {"id": "unknown", "measurement": 0.5},
            {"id": "water_tank_1", "measurement": 1.0}
        ]"#;

        assert!(apply_payload(&ctx, payload).await);
        assert_eq!(ctx.applied.lock().unwrap().len(), 1);
    }

    #[test]
    fn should_report_not_connected_before_setup() {
        let source = MqttSource::new(MqttConfig::default());
        assert!(source.client.is_none());
        assert_eq!(source.name(), "mqtt");
    }
}
