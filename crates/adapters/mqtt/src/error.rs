//! MQTT adapter error types.

use tankhub_domain::error::TankHubError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The MQTT client has not been initialised yet.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// Failed to serialize a snapshot payload as JSON.
    #[error("failed to encode MQTT payload")]
    PayloadEncode(#[source] serde_json::Error),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] TankHubError),
}

impl MqttError {
    /// Convert into a [`TankHubError::Storage`] for propagation across
    /// port boundaries.
    pub fn into_domain(self) -> TankHubError {
        match self {
            Self::Domain(err) => err,
            other => TankHubError::Storage(Box::new(other)),
        }
    }
}

impl From<MqttError> for TankHubError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
