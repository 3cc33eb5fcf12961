//! Tank reading — one tank's current sensor snapshot.

use serde::{Deserialize, Serialize};

use crate::id::TankId;

/// Immutable display snapshot of a single tank.
///
/// Snapshots are produced by the hub (batch fetch, update messages) and
/// consumed by display layers, which never mutate them — presentation
/// state is recomputed from the snapshot instead. Absent fields are valid
/// "no data" states, not errors: a tank that has not reported yet simply
/// has no percentage and no last-updated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankReading {
    pub id: TankId,
    pub label: String,
    /// Fill percentage, 0–100. Absent until a valid measurement arrives.
    #[serde(default)]
    pub percentage: Option<f64>,
    /// Set when the last measurement fell outside the valid range or the
    /// tank geometry. Always overrides percentage-based classification.
    #[serde(default)]
    pub sensor_error: bool,
    /// Human-readable `YYYY-MM-DD HH:MM` text.
    #[serde(default)]
    pub last_updated: Option<String>,
    /// At or below this percentage the tank is critically low.
    #[serde(default)]
    pub critical_level: Option<f64>,
    /// At or below this percentage the tank is getting low.
    #[serde(default)]
    pub warning_level: Option<f64>,
    /// At or above this percentage the tank is overflowing.
    #[serde(default)]
    pub overflow_level: Option<f64>,
    /// Disabled tanks are rendered hidden but remain in the document.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl TankReading {
    /// Create a builder for constructing a [`TankReading`].
    #[must_use]
    pub fn builder() -> TankReadingBuilder {
        TankReadingBuilder::default()
    }
}

/// Step-by-step builder for [`TankReading`].
#[derive(Debug)]
pub struct TankReadingBuilder {
    id: TankId,
    label: String,
    percentage: Option<f64>,
    sensor_error: bool,
    last_updated: Option<String>,
    critical_level: Option<f64>,
    warning_level: Option<f64>,
    overflow_level: Option<f64>,
    enabled: bool,
}

impl Default for TankReadingBuilder {
    fn default() -> Self {
        Self {
            id: TankId::default(),
            label: String::new(),
            percentage: None,
            sensor_error: false,
            last_updated: None,
            critical_level: None,
            warning_level: None,
            overflow_level: None,
            enabled: true,
        }
    }
}

impl TankReadingBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<TankId>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn percentage(mut self, percentage: f64) -> Self {
        self.percentage = Some(percentage);
        self
    }

    #[must_use]
    pub fn sensor_error(mut self, sensor_error: bool) -> Self {
        self.sensor_error = sensor_error;
        self
    }

    #[must_use]
    pub fn last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = Some(last_updated.into());
        self
    }

    #[must_use]
    pub fn critical_level(mut self, level: f64) -> Self {
        self.critical_level = Some(level);
        self
    }

    #[must_use]
    pub fn warning_level(mut self, level: f64) -> Self {
        self.warning_level = Some(level);
        self
    }

    #[must_use]
    pub fn overflow_level(mut self, level: f64) -> Self {
        self.overflow_level = Some(level);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Consume the builder and return a [`TankReading`].
    #[must_use]
    pub fn build(self) -> TankReading {
        TankReading {
            id: self.id,
            label: self.label,
            percentage: self.percentage,
            sensor_error: self.sensor_error,
            last_updated: self.last_updated,
            critical_level: self.critical_level,
            warning_level: self.warning_level,
            overflow_level: self.overflow_level,
            enabled: self.enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_empty_enabled_reading() {
        let reading = TankReading::builder().id("water_tank_1").build();
        assert_eq!(reading.percentage, None);
        assert!(!reading.sensor_error);
        assert_eq!(reading.last_updated, None);
        assert!(reading.enabled);
    }

    #[test]
    fn should_build_reading_with_all_fields() {
        let reading = TankReading::builder()
            .id("water_tank_1")
            .label("Cistern")
            .percentage(42.5)
            .last_updated("2024-03-01 10:30")
            .critical_level(8.0)
            .warning_level(25.0)
            .overflow_level(80.0)
            .enabled(false)
            .build();

        assert_eq!(reading.id.as_str(), "water_tank_1");
        assert_eq!(reading.label, "Cistern");
        assert_eq!(reading.percentage, Some(42.5));
        assert_eq!(reading.last_updated.as_deref(), Some("2024-03-01 10:30"));
        assert_eq!(reading.critical_level, Some(8.0));
        assert!(!reading.enabled);
    }

    #[test]
    fn should_treat_missing_json_fields_as_no_data() {
        let reading: TankReading =
            serde_json::from_str(r#"{"id":"water_tank_1","label":"Cistern"}"#).unwrap();
        assert_eq!(reading.percentage, None);
        assert!(!reading.sensor_error);
        assert_eq!(reading.warning_level, None);
        assert!(reading.enabled);
    }

    #[test]
    fn should_roundtrip_through_serde_json() {
        let reading = TankReading::builder()
            .id("water_tank_2")
            .label("Steel tank")
            .percentage(61.4)
            .sensor_error(true)
            .build();
        let json = serde_json::to_string(&reading).unwrap();
        let parsed: TankReading = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reading);
    }
}
