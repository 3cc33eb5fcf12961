//! Tank geometry — fill percentage from an ultrasonic air-gap measurement.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Physical shape of a tank.
///
/// The level sensor sits above the tank and reports the distance down to
/// the water surface (the air gap, after subtracting the mount offset).
/// Each shape converts that gap into a fill percentage of its total volume.
/// All dimensions are in the same unit as the measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Geometry {
    Rectangular {
        width: f64,
        length: f64,
        height: f64,
    },
    /// Cylinder lying on its side; the circular cross-section faces up.
    HorizontalCylinder { length: f64, diameter: f64 },
    /// Cylinder standing upright.
    VerticalCylinder { diameter: f64, height: f64 },
    /// Horizontal tank with an elliptical cross-section.
    Elliptical {
        length: f64,
        horizontal_axis: f64,
        vertical_axis: f64,
    },
}

impl Geometry {
    /// Interior depth: the largest air gap that still touches water.
    #[must_use]
    pub fn depth(&self) -> f64 {
        match self {
            Self::Rectangular { height, .. } | Self::VerticalCylinder { height, .. } => *height,
            Self::HorizontalCylinder { diameter, .. } => *diameter,
            Self::Elliptical { vertical_axis, .. } => *vertical_axis,
        }
    }

    /// Fill percentage (0–100) for the given air gap.
    ///
    /// Returns `None` when the gap misses the tank (negative, non-finite,
    /// or deeper than [`depth`](Self::depth)) — callers treat that as an
    /// invalid sensor measurement.
    #[must_use]
    pub fn fill_percentage(&self, gap: f64) -> Option<f64> {
        let depth = self.depth();
        if !gap.is_finite() || gap < 0.0 || gap > depth {
            return None;
        }
        let pct = match self {
            Self::Rectangular { height, .. } | Self::VerticalCylinder { height, .. } => {
                100.0 * (height - gap) / height
            }
            Self::HorizontalCylinder { diameter, .. } => {
                // Circular-segment area over the full disc.
                let r = diameter / 2.0;
                let level = diameter - gap;
                let segment = ((r - level) / r).clamp(-1.0, 1.0).acos() * r * r
                    - (r - level) * (2.0 * r * level - level * level).max(0.0).sqrt();
                100.0 * segment / (std::f64::consts::PI * r * r)
            }
            Self::Elliptical { vertical_axis, .. } => {
                // Elliptical-segment area over the full ellipse; the length
                // and horizontal axis cancel out of the ratio.
                let level = vertical_axis - gap;
                let ratio = (1.0 - 2.0 * level / vertical_axis).clamp(-1.0, 1.0);
                let segment = ratio.acos() - ratio * (1.0 - ratio * ratio).sqrt();
                100.0 * segment / std::f64::consts::PI
            }
        };
        Some(pct.clamp(0.0, 100.0))
    }

    /// Check that every dimension is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveDimension`] naming the first
    /// offending dimension.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let dimensions: Vec<(&'static str, f64)> = match self {
            Self::Rectangular {
                width,
                length,
                height,
            } => vec![("width", *width), ("length", *length), ("height", *height)],
            Self::HorizontalCylinder { length, diameter } => {
                vec![("length", *length), ("diameter", *diameter)]
            }
            Self::VerticalCylinder { diameter, height } => {
                vec![("diameter", *diameter), ("height", *height)]
            }
            Self::Elliptical {
                length,
                horizontal_axis,
                vertical_axis,
            } => vec![
                ("length", *length),
                ("horizontal_axis", *horizontal_axis),
                ("vertical_axis", *vertical_axis),
            ],
        };
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::NonPositiveDimension(name));
            }
        }
        Ok(())
    }
}
