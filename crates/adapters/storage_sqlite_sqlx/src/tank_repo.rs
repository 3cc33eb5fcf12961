//! `SQLite` implementation of [`TankRepository`].

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use tankhub_app::ports::TankRepository;
use tankhub_domain::error::TankHubError;
use tankhub_domain::geometry::Geometry;
use tankhub_domain::id::TankId;
use tankhub_domain::tank::Tank;

use crate::error::StorageError;

/// Wrapper for converting database rows into domain types without
/// polluting domain structs with database concerns.
struct Wrapper(Tank);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<Tank> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let label: String = row.try_get("label")?;
        let geometry_json: String = row.try_get("geometry")?;
        let sensor_topic: String = row.try_get("sensor_topic")?;
        let sensor_offset: f64 = row.try_get("sensor_offset")?;
        let min_valid_measurement: Option<f64> = row.try_get("min_valid_measurement")?;
        let max_valid_measurement: Option<f64> = row.try_get("max_valid_measurement")?;
        let enabled: bool = row.try_get("enabled")?;
        let critical_level: Option<f64> = row.try_get("critical_level")?;
        let warning_level: Option<f64> = row.try_get("warning_level")?;
        let overflow_level: Option<f64> = row.try_get("overflow_level")?;
        let measurement: Option<f64> = row.try_get("measurement")?;
        let percentage: Option<f64> = row.try_get("percentage")?;
        let sensor_error: bool = row.try_get("sensor_error")?;
        let last_updated_str: Option<String> = row.try_get("last_updated")?;

        let geometry: Geometry = serde_json::from_str(&geometry_json)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let last_updated = last_updated_str
            .map(|text| {
                chrono::DateTime::parse_from_rfc3339(&text)
                    .map(|ts| ts.to_utc())
                    .map_err(|err| sqlx::Error::Decode(Box::new(err)))
            })
            .transpose()?;

        Ok(Self(Tank {
            id: TankId::new(id),
            label,
            geometry,
            sensor_topic,
            sensor_offset,
            min_valid_measurement,
            max_valid_measurement,
            enabled,
            critical_level,
            warning_level,
            overflow_level,
            measurement,
            percentage,
            sensor_error,
            last_updated,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO tanks (id, label, geometry, sensor_topic, sensor_offset,
        min_valid_measurement, max_valid_measurement, enabled,
        critical_level, warning_level, overflow_level,
        measurement, percentage, sensor_error, last_updated)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM tanks WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM tanks ORDER BY rowid";

const UPDATE: &str = r"
    UPDATE tanks
    SET label = ?, geometry = ?, sensor_topic = ?, sensor_offset = ?,
        min_valid_measurement = ?, max_valid_measurement = ?, enabled = ?,
        critical_level = ?, warning_level = ?, overflow_level = ?,
        measurement = ?, percentage = ?, sensor_error = ?, last_updated = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM tanks WHERE id = ?";

/// `SQLite`-backed tank repository.
pub struct SqliteTankRepository {
    pool: SqlitePool,
}

impl SqliteTankRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TankRepository for SqliteTankRepository {
    async fn create(&self, tank: Tank) -> Result<Tank, TankHubError> {
        let geometry_json = serde_json::to_string(&tank.geometry).map_err(StorageError::from)?;

        sqlx::query(INSERT)
            .bind(tank.id.as_str())
            .bind(&tank.label)
            .bind(&geometry_json)
            .bind(&tank.sensor_topic)
            .bind(tank.sensor_offset)
            .bind(tank.min_valid_measurement)
            .bind(tank.max_valid_measurement)
            .bind(tank.enabled)
            .bind(tank.critical_level)
            .bind(tank.warning_level)
            .bind(tank.overflow_level)
            .bind(tank.measurement)
            .bind(tank.percentage)
            .bind(tank.sensor_error)
            .bind(tank.last_updated.map(|ts| ts.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tank)
    }

    async fn get_by_id(&self, id: &TankId) -> Result<Option<Tank>, TankHubError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<Tank>, TankHubError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, tank: Tank) -> Result<Tank, TankHubError> {
        let geometry_json = serde_json::to_string(&tank.geometry).map_err(StorageError::from)?;

        sqlx::query(UPDATE)
            .bind(&tank.label)
            .bind(&geometry_json)
            .bind(&tank.sensor_topic)
            .bind(tank.sensor_offset)
            .bind(tank.min_valid_measurement)
            .bind(tank.max_valid_measurement)
            .bind(tank.enabled)
            .bind(tank.critical_level)
            .bind(tank.warning_level)
            .bind(tank.overflow_level)
            .bind(tank.measurement)
            .bind(tank.percentage)
            .bind(tank.sensor_error)
            .bind(tank.last_updated.map(|ts| ts.to_rfc3339()))
            .bind(tank.id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(tank)
    }

    async fn delete(&self, id: &TankId) -> Result<(), TankHubError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use tankhub_domain::time::now;

    async fn setup() -> SqliteTankRepository {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        SqliteTankRepository::new(db.pool().clone())
    }

    fn test_tank(id: &str) -> Tank {
        Tank::builder()
            .id(id)
            .label("Cistern")
            .geometry(Geometry::Rectangular {
                width: 2.0,
                length: 5.0,
                height: 2.0,
            })
            .sensor_topic("WATER_TANK_MEASUREMENT")
            .critical_level(8.0)
            .warning_level(25.0)
            .overflow_level(80.0)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_create_and_retrieve_tank_when_valid() {
        let repo = setup().await;
        let tank = test_tank("water_tank_1");

        repo.create(tank.clone()).await.unwrap();

        let fetched = repo
            .get_by_id(&TankId::new("water_tank_1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id.as_str(), "water_tank_1");
        assert_eq!(fetched.label, "Cistern");
        assert_eq!(fetched.geometry, tank.geometry);
        assert_eq!(fetched.critical_level, Some(8.0));
        assert!(fetched.enabled);
        assert_eq!(fetched.percentage, None);
        assert_eq!(fetched.last_updated, None);
    }

    #[tokio::test]
    async fn should_return_none_when_tank_not_found() {
        let repo = setup().await;
        let result = repo.get_by_id(&TankId::new("missing")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_list_tanks_in_insertion_order() {
        let repo = setup().await;
        repo.create(test_tank("water_tank_2")).await.unwrap();
        repo.create(test_tank("water_tank_1")).await.unwrap();

        let all = repo.get_all().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|tank| tank.id.as_str()).collect();
        assert_eq!(ids, vec!["water_tank_2", "water_tank_1"]);
    }

    #[tokio::test]
    async fn should_persist_level_data_through_update() {
        let repo = setup().await;
        let mut tank = test_tank("water_tank_1");
        repo.create(tank.clone()).await.unwrap();

        tank.apply_measurement(0.5, now());
        repo.update(tank).await.unwrap();

        let fetched = repo
            .get_by_id(&TankId::new("water_tank_1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.measurement, Some(0.5));
        assert_eq!(fetched.percentage, Some(75.0));
        assert!(!fetched.sensor_error);
        assert!(fetched.last_updated.is_some());
    }

    #[tokio::test]
    async fn should_persist_sensor_error_through_update() {
        let repo = setup().await;
        let mut tank = test_tank("water_tank_1");
        repo.create(tank.clone()).await.unwrap();

        tank.apply_measurement(9.0, now());
        repo.update(tank).await.unwrap();

        let fetched = repo
            .get_by_id(&TankId::new("water_tank_1"))
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.sensor_error);
        assert_eq!(fetched.percentage, None);
    }

    #[tokio::test]
    async fn should_roundtrip_every_geometry_shape() {
        let repo = setup().await;
        let shapes = [
            Geometry::HorizontalCylinder {
                length: 3.0,
                diameter: 2.0,
            },
            Geometry::VerticalCylinder {
                diameter: 2.0,
                height: 2.0,
            },
            Geometry::Elliptical {
                length: 2.0,
                horizontal_axis: 1.0,
                vertical_axis: 0.8,
            },
        ];
        for (index, geometry) in shapes.into_iter().enumerate() {
            let mut tank = test_tank(&format!("tank_{index}"));
            tank.geometry = geometry.clone();
            repo.create(tank).await.unwrap();

            let fetched = repo
                .get_by_id(&TankId::new(format!("tank_{index}")))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(fetched.geometry, geometry);
        }
    }

    #[tokio::test]
    async fn should_delete_tank_when_exists() {
        let repo = setup().await;
        repo.create(test_tank("water_tank_1")).await.unwrap();

        repo.delete(&TankId::new("water_tank_1")).await.unwrap();

        let result = repo.get_by_id(&TankId::new("water_tank_1")).await.unwrap();
        assert!(result.is_none());
    }
}
