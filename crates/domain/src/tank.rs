//! Tank — configuration aggregate and current level data.

use serde::{Deserialize, Serialize};

use crate::error::{TankHubError, ValidationError};
use crate::geometry::Geometry;
use crate::id::TankId;
use crate::reading::TankReading;
use crate::time::Timestamp;

/// A monitored water tank: identity, shape, sensor wiring, thresholds,
/// and the level data from its most recent measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub id: TankId,
    pub label: String,
    pub geometry: Geometry,
    /// MQTT topic the tank's level sensor publishes on.
    pub sensor_topic: String,
    /// Distance from the sensor mount down to the tank's top edge.
    pub sensor_offset: f64,
    /// Raw measurements below this value are rejected as sensor errors.
    pub min_valid_measurement: Option<f64>,
    /// Raw measurements above this value are rejected as sensor errors.
    pub max_valid_measurement: Option<f64>,
    /// Disabled tanks keep receiving measurements but are hidden on the
    /// dashboard.
    pub enabled: bool,
    pub critical_level: Option<f64>,
    pub warning_level: Option<f64>,
    pub overflow_level: Option<f64>,
    /// Raw sensor value of the most recent measurement.
    pub measurement: Option<f64>,
    /// Fill percentage derived from the most recent valid measurement.
    pub percentage: Option<f64>,
    pub sensor_error: bool,
    pub last_updated: Option<Timestamp>,
}

impl Tank {
    /// Create a builder for constructing a [`Tank`].
    #[must_use]
    pub fn builder() -> TankBuilder {
        TankBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::Validation`] when the id, label, or sensor
    /// topic is empty, or a geometry dimension is not positive.
    pub fn validate(&self) -> Result<(), TankHubError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyTankId.into());
        }
        if self.label.is_empty() {
            return Err(ValidationError::EmptyLabel.into());
        }
        if self.sensor_topic.is_empty() {
            return Err(ValidationError::EmptySensorTopic.into());
        }
        self.geometry.validate()?;
        Ok(())
    }

    /// Apply a raw sensor measurement.
    ///
    /// Values outside the configured min/max bounds, or whose air gap
    /// misses the tank, set the sensor-error flag and clear the
    /// percentage. Every measurement stamps `last_updated` so the
    /// dashboard shows when the sensor last spoke, valid or not.
    pub fn apply_measurement(&mut self, value: f64, at: Timestamp) {
        self.measurement = Some(value);
        self.last_updated = Some(at);

        if self.min_valid_measurement.is_some_and(|min| value < min)
            || self.max_valid_measurement.is_some_and(|max| value > max)
        {
            self.sensor_error = true;
            self.percentage = None;
            return;
        }

        match self.geometry.fill_percentage(value - self.sensor_offset) {
            Some(percentage) => {
                self.sensor_error = false;
                self.percentage = Some(percentage);
            }
            None => {
                self.sensor_error = true;
                self.percentage = None;
            }
        }
    }

    /// Produce the immutable display snapshot for this tank.
    #[must_use]
    pub fn snapshot(&self) -> TankReading {
        TankReading {
            id: self.id.clone(),
            label: self.label.clone(),
            percentage: self.percentage,
            sensor_error: self.sensor_error,
            last_updated: self
                .last_updated
                .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string()),
            critical_level: self.critical_level,
            warning_level: self.warning_level,
            overflow_level: self.overflow_level,
            enabled: self.enabled,
        }
    }
}

/// Step-by-step builder for [`Tank`].
#[derive(Debug, Default)]
pub struct TankBuilder {
    id: Option<TankId>,
    label: Option<String>,
    geometry: Option<Geometry>,
    sensor_topic: Option<String>,
    sensor_offset: f64,
    min_valid_measurement: Option<f64>,
    max_valid_measurement: Option<f64>,
    enabled: Option<bool>,
    critical_level: Option<f64>,
    warning_level: Option<f64>,
    overflow_level: Option<f64>,
}

impl TankBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<TankId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    #[must_use]
    pub fn sensor_topic(mut self, topic: impl Into<String>) -> Self {
        self.sensor_topic = Some(topic.into());
        self
    }

    #[must_use]
    pub fn sensor_offset(mut self, offset: f64) -> Self {
        self.sensor_offset = offset;
        self
    }

    #[must_use]
    pub fn min_valid_measurement(mut self, value: f64) -> Self {
        self.min_valid_measurement = Some(value);
        self
    }

    #[must_use]
    pub fn max_valid_measurement(mut self, value: f64) -> Self {
        self.max_valid_measurement = Some(value);
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
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

    /// Consume the builder, validate, and return a [`Tank`].
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::Validation`] when required fields are
    /// missing or invariants fail.
    pub fn build(self) -> Result<Tank, TankHubError> {
        let geometry = self.geometry.ok_or(ValidationError::MissingGeometry)?;
        let tank = Tank {
            id: self.id.unwrap_or_default(),
            label: self.label.unwrap_or_default(),
            geometry,
            sensor_topic: self.sensor_topic.unwrap_or_default(),
            sensor_offset: self.sensor_offset,
            min_valid_measurement: self.min_valid_measurement,
            max_valid_measurement: self.max_valid_measurement,
            enabled: self.enabled.unwrap_or(true),
            critical_level: self.critical_level,
            warning_level: self.warning_level,
            overflow_level: self.overflow_level,
            measurement: None,
            percentage: None,
            sensor_error: false,
            last_updated: None,
        };
        tank.validate()?;
        Ok(tank)
    }
}
