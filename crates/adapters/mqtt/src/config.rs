//! MQTT source configuration.

use serde::Deserialize;

/// Configuration for the MQTT measurement source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// Websocket port reported to dashboard clients via `GET /api/broker`.
    pub broker_ws_port: u16,
    /// MQTT client identifier prefix; a random suffix is appended per
    /// connection.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Topic on which reading snapshot maps are published (retained).
    pub data_topic: String,
    /// Topic on which clients request a snapshot republish.
    pub request_topic: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            broker_ws_port: 8080,
            client_id: "tankhub".to_string(),
            keep_alive_secs: 30,
            data_topic: "WaterTankData".to_string(),
            request_topic: "WaterTankDataRequest".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.broker_ws_port, 8080);
        assert_eq!(config.client_id, "tankhub");
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.data_topic, "WaterTankData");
        assert_eq!(config.request_topic, "WaterTankDataRequest");
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            broker_host = "mqtt.example.com"
            broker_port = 8883
            broker_ws_port = 9001
            client_id = "my-hub"
            keep_alive_secs = 60
            data_topic = "tanks/data"
            request_topic = "tanks/request"
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "mqtt.example.com");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.broker_ws_port, 9001);
        assert_eq!(config.client_id, "my-hub");
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.data_topic, "tanks/data");
        assert_eq!(config.request_topic, "tanks/request");
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "tankhub");
    }
}
