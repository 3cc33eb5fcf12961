//! Tank service — use-cases for managing tanks and applying measurements.

use tankhub_domain::error::{NotFoundError, TankHubError};
use tankhub_domain::event::{Event, EventKind};
use tankhub_domain::id::TankId;
use tankhub_domain::reading::TankReading;
use tankhub_domain::tank::Tank;
use tankhub_domain::time::now;

use crate::ports::{EventPublisher, TankRepository};

/// Application service for tank CRUD and measurement ingestion.
pub struct TankService<R, P> {
    repo: R,
    events: P,
}

impl<R: TankRepository, P: EventPublisher> TankService<R, P> {
    /// Create a new service backed by the given repository and event
    /// publisher.
    pub fn new(repo: R, events: P) -> Self {
        Self { repo, events }
    }

    /// Register a new tank after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, tank), fields(tank_id = %tank.id))]
    pub async fn register_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
        tank.validate()?;
        let tank = self.repo.create(tank).await?;
        self.events
            .publish(Event::new(
                EventKind::TankRegistered,
                Some(tank.id.clone()),
                serde_json::to_value(tank.snapshot()).map_err(json_error)?,
            ))
            .await?;
        Ok(tank)
    }

    /// Look up a tank by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::NotFound`] when no tank with `id` exists,
    /// or a storage error from the repository.
    pub async fn get_tank(&self, id: &TankId) -> Result<Tank, TankHubError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Tank",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all tanks, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_tanks(&self) -> Result<Vec<Tank>, TankHubError> {
        self.repo.get_all().await
    }

    /// Reading snapshots of every tank, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_readings(&self) -> Result<Vec<TankReading>, TankHubError> {
        Ok(self
            .repo
            .get_all()
            .await?
            .iter()
            .map(Tank::snapshot)
            .collect())
    }

    /// Distinct sensor topics across all tanks, in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn sensor_topics(&self) -> Result<Vec<String>, TankHubError> {
        let mut topics: Vec<String> = Vec::new();
        for tank in self.repo.get_all().await? {
            if !topics.contains(&tank.sensor_topic) {
                topics.push(tank.sensor_topic);
            }
        }
        Ok(topics)
    }

    /// Replace an existing tank's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::Validation`] if invariants fail, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self, tank), fields(tank_id = %tank.id))]
    pub async fn update_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
        tank.validate()?;
        self.repo.update(tank).await
    }

    /// Create or update a tank by id, preserving any existing level data.
    ///
    /// Sources call this on startup; re-registering a known tank must not
    /// wipe the reading its sensor already delivered.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, tank), fields(tank_id = %tank.id))]
    pub async fn upsert_tank(&self, tank: Tank) -> Result<Tank, TankHubError> {
        if let Some(existing) = self.repo.get_by_id(&tank.id).await? {
            let updated = Tank {
                measurement: existing.measurement,
                percentage: existing.percentage,
                sensor_error: existing.sensor_error,
                last_updated: existing.last_updated,
                ..tank
            };
            return self.update_tank(updated).await;
        }
        self.register_tank(tank).await
    }

    /// Delete a tank by id.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn delete_tank(&self, id: &TankId) -> Result<(), TankHubError> {
        self.repo.delete(id).await?;
        self.events
            .publish(Event::new(
                EventKind::TankRemoved,
                Some(id.clone()),
                serde_json::Value::Null,
            ))
            .await?;
        Ok(())
    }

    /// Apply a raw sensor measurement to the identified tank.
    ///
    /// Recomputes the tank's level data, persists it, publishes a
    /// `reading_updated` event, and returns the fresh snapshot. A failure
    /// here is isolated to this measurement — later ones are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`TankHubError::NotFound`] for an unknown tank id, or a
    /// storage error from the repository.
    #[tracing::instrument(skip(self), fields(tank_id = %id))]
    pub async fn apply_measurement(
        &self,
        id: &TankId,
        value: f64,
    ) -> Result<TankReading, TankHubError> {
        let Some(mut tank) = self.repo.get_by_id(id).await? else {
            tracing::warn!(tank_id = %id, "measurement for unknown tank id");
            return Err(NotFoundError {
                entity: "Tank",
                id: id.to_string(),
            }
            .into());
        };

        tank.apply_measurement(value, now());
        let tank = self.repo.update(tank).await?;
        let snapshot = tank.snapshot();

        self.events
            .publish(Event::new(
                EventKind::ReadingUpdated,
                Some(tank.id.clone()),
                serde_json::to_value(&snapshot).map_err(json_error)?,
            ))
            .await?;

        Ok(snapshot)
    }
}

fn json_error(err: serde_json::Error) -> TankHubError {
    TankHubError::Storage(Box::new(err))
}
