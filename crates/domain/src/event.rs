//! Domain events — immutable records of hub activity.
//!
//! Events are produced when readings change or tanks are registered and
//! removed, and fan out through the in-process event bus to subscribers
//! (SSE clients, republishing sources).

use serde::{Deserialize, Serialize};

use crate::id::TankId;
use crate::time::{Timestamp, now};

/// Unique identifier for an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A tank's reading changed; `data` carries the fresh snapshot.
    ReadingUpdated,
    TankRegistered,
    TankRemoved,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadingUpdated => f.write_str("reading_updated"),
            Self::TankRegistered => f.write_str("tank_registered"),
            Self::TankRemoved => f.write_str("tank_removed"),
        }
    }
}

/// An immutable record of something that happened in the hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub kind: EventKind,
    pub tank_id: Option<TankId>,
    /// Kind-specific payload, e.g. the reading snapshot.
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl Event {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(kind: EventKind, tank_id: Option<TankId>, data: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            kind,
            tank_id,
            data,
            timestamp: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_unique_ids_when_called_twice() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_roundtrip_id_through_display_and_from_str() {
        let id = EventId::new();
        let text = id.to_string();
        let parsed: EventId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_display_snake_case_kind() {
        assert_eq!(EventKind::ReadingUpdated.to_string(), "reading_updated");
        assert_eq!(EventKind::TankRemoved.to_string(), "tank_removed");
    }

    #[test]
    fn should_create_event_with_tank_id_and_data() {
        let event = Event::new(
            EventKind::ReadingUpdated,
            Some(TankId::new("water_tank_1")),
            serde_json::json!({"percentage": 42.0}),
        );
        assert_eq!(event.kind, EventKind::ReadingUpdated);
        assert_eq!(event.tank_id.as_ref().unwrap().as_str(), "water_tank_1");
        assert_eq!(event.data["percentage"], 42.0);
    }

    #[test]
    fn should_roundtrip_event_through_serde_json() {
        let event = Event::new(EventKind::TankRegistered, None, serde_json::json!({}));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, event.id);
        assert_eq!(parsed.kind, event.kind);
    }
}
