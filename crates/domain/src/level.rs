//! Level state — classified display category derived from a reading.

use serde::{Deserialize, Serialize};

use crate::reading::TankReading;

/// Discrete display state of a tank's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelState {
    #[default]
    Normal,
    Warning,
    Critical,
    Overflow,
    SensorError,
}

impl LevelState {
    /// Classify a reading. Rules are evaluated in order; first match wins.
    ///
    /// A set sensor-error flag takes precedence whatever the percentage
    /// says. Absent thresholds are skipped; an absent percentage is
    /// `Normal`.
    #[must_use]
    pub fn classify(reading: &TankReading) -> Self {
        if reading.sensor_error {
            return Self::SensorError;
        }
        let Some(percentage) = reading.percentage else {
            return Self::Normal;
        };
        if let Some(critical) = reading.critical_level {
            if percentage <= critical {
                return Self::Critical;
            }
        }
        if let Some(warning) = reading.warning_level {
            if percentage <= warning {
                return Self::Warning;
            }
        }
        if let Some(overflow) = reading.overflow_level {
            if percentage >= overflow {
                return Self::Overflow;
            }
        }
        Self::Normal
    }

    /// Whether this state warrants operator attention.
    #[must_use]
    pub fn is_alert(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Token used as the dashboard CSS class (`sensor_error`, `critical`, …).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Overflow => "overflow",
            Self::SensorError => "sensor_error",
        }
    }
}

impl std::fmt::Display for LevelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::TankReadingBuilder;

    fn reading() -> TankReadingBuilder {
        TankReading::builder().id("water_tank_1").label("Cistern")
    }

    #[test]
    fn should_classify_sensor_error_regardless_of_percentage() {
        let full = reading()
            .percentage(95.0)
            .sensor_error(true)
            .critical_level(10.0)
            .overflow_level(90.0)
            .build();
        assert_eq!(LevelState::classify(&full), LevelState::SensorError);

        let empty = reading().sensor_error(true).build();
        assert_eq!(LevelState::classify(&empty), LevelState::SensorError);
    }

    #[test]
    fn should_classify_normal_when_percentage_absent() {
        let r = reading().critical_level(10.0).warning_level(20.0).build();
        assert_eq!(LevelState::classify(&r), LevelState::Normal);
    }

    #[test]
    fn should_classify_critical_at_or_below_critical_level() {
        let r = reading().percentage(5.0).critical_level(10.0).build();
        assert_eq!(LevelState::classify(&r), LevelState::Critical);

        let boundary = reading().percentage(10.0).critical_level(10.0).build();
        assert_eq!(LevelState::classify(&boundary), LevelState::Critical);
    }

    #[test]
    fn should_classify_warning_between_critical_and_warning_levels() {
        let r = reading()
            .percentage(15.0)
            .critical_level(10.0)
            .warning_level(20.0)
            .build();
        assert_eq!(LevelState::classify(&r), LevelState::Warning);
    }

    #[test]
    fn should_prefer_critical_over_warning_when_both_match() {
        let r = reading()
            .percentage(5.0)
            .critical_level(10.0)
            .warning_level(20.0)
            .build();
        assert_eq!(LevelState::classify(&r), LevelState::Critical);
    }

    #[test]
    fn should_classify_overflow_at_or_above_overflow_level() {
        let r = reading().percentage(95.0).overflow_level(90.0).build();
        assert_eq!(LevelState::classify(&r), LevelState::Overflow);

        let boundary = reading().percentage(90.0).overflow_level(90.0).build();
        assert_eq!(LevelState::classify(&boundary), LevelState::Overflow);
    }

    #[test]
    fn should_classify_normal_when_no_thresholds_configured() {
        let r = reading().percentage(50.0).build();
        assert_eq!(LevelState::classify(&r), LevelState::Normal);
    }

    #[test]
    fn should_skip_absent_thresholds() {
        // Low percentage but no critical level configured: only the warning
        // threshold applies.
        let r = reading().percentage(5.0).warning_level(20.0).build();
        assert_eq!(LevelState::classify(&r), LevelState::Warning);
    }

    #[test]
    fn should_report_alert_for_everything_but_normal() {
        assert!(!LevelState::Normal.is_alert());
        assert!(LevelState::Warning.is_alert());
        assert!(LevelState::Critical.is_alert());
        assert!(LevelState::Overflow.is_alert());
        assert!(LevelState::SensorError.is_alert());
    }

    #[test]
    fn should_display_css_token() {
        assert_eq!(LevelState::SensorError.to_string(), "sensor_error");
        assert_eq!(LevelState::Normal.to_string(), "normal");
    }

    #[test]
    fn should_serialize_as_snake_case_token() {
        let json = serde_json::to_string(&LevelState::SensorError).unwrap();
        assert_eq!(json, "\"sensor_error\"");
        let parsed: LevelState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LevelState::SensorError);
    }
}
