//! Typed identifier for tanks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a [`Tank`](crate::tank::Tank).
///
/// Tank ids are operator-chosen slugs (`water_tank_1`), not generated
/// UUIDs: sensors address tanks by id in their payloads and dashboard rows
/// are keyed by it, so the id has to be stable across restarts and legible
/// in broker traffic.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TankId(String);

impl TankId {
    /// Wrap an identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (invalid; caught by tank validation).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TankId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TankId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display() {
        let id = TankId::new("water_tank_1");
        assert_eq!(id.to_string(), "water_tank_1");
        assert_eq!(id.as_str(), "water_tank_1");
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = TankId::new("water_tank_1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"water_tank_1\"");
        let parsed: TankId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn should_report_empty_for_default() {
        assert!(TankId::default().is_empty());
        assert!(!TankId::new("t").is_empty());
    }

    #[test]
    fn should_be_usable_as_map_key() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(TankId::new("b"), 2);
        map.insert(TankId::new("a"), 1);
        let keys: Vec<&str> = map.keys().map(TankId::as_str).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }
}
