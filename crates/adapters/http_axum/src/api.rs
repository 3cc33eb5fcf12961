//! JSON API handlers.
//!
//! - `GET    /api/tanks`      — reading snapshots for every tank, in order
//! - `GET    /api/tanks/{id}` — one snapshot
//! - `POST   /api/tanks`      — register a tank
//! - `PUT    /api/tanks/{id}` — update a tank's configuration
//! - `DELETE /api/tanks/{id}` — remove a tank
//! - `GET    /api/broker`     — broker settings for pub/sub clients
//! - `GET    /api/events`     — SSE stream of domain events

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use tankhub_app::ports::{EventPublisher, EventSubscriber, TankRepository};
use tankhub_domain::geometry::Geometry;
use tankhub_domain::id::TankId;
use tankhub_domain::reading::TankReading;
use tankhub_domain::tank::Tank;

use crate::error::ApiError;
use crate::state::{AppState, BrokerSettings};

/// Assemble the API sub-router.
pub fn routes<R, P, B>() -> Router<AppState<R, P, B>>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    Router::new()
        .route("/tanks", get(list_tanks).post(create_tank))
        .route(
            "/tanks/{id}",
            get(get_tank).put(update_tank).delete(delete_tank),
        )
        .route("/broker", get(broker_settings))
        .route("/events", get(event_stream))
}

/// Tank configuration as accepted over the wire.
#[derive(Debug, Deserialize)]
struct TankPayload {
    #[serde(default)]
    id: String,
    label: String,
    geometry: Geometry,
    sensor_topic: String,
    #[serde(default)]
    sensor_offset: f64,
    #[serde(default)]
    min_valid_measurement: Option<f64>,
    #[serde(default)]
    max_valid_measurement: Option<f64>,
    #[serde(default = "default_enabled")]
    enabled: bool,
    #[serde(default)]
    critical_level: Option<f64>,
    #[serde(default)]
    warning_level: Option<f64>,
    #[serde(default)]
    overflow_level: Option<f64>,
}

fn default_enabled() -> bool {
    true
}

impl TankPayload {
    /// Build a fresh tank with the given id; level fields start empty.
    fn into_tank(self, id: TankId) -> Tank {
        Tank {
            id,
            label: self.label,
            geometry: self.geometry,
            sensor_topic: self.sensor_topic,
            sensor_offset: self.sensor_offset,
            min_valid_measurement: self.min_valid_measurement,
            max_valid_measurement: self.max_valid_measurement,
            enabled: self.enabled,
            critical_level: self.critical_level,
            warning_level: self.warning_level,
            overflow_level: self.overflow_level,
            measurement: None,
            percentage: None,
            sensor_error: false,
            last_updated: None,
        }
    }
}

async fn list_tanks<R, P, B>(
    State(state): State<AppState<R, P, B>>,
) -> Result<Json<Vec<TankReading>>, ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    Ok(Json(state.tank_service.list_readings().await?))
}

async fn get_tank<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path(id): Path<String>,
) -> Result<Json<TankReading>, ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    let tank = state.tank_service.get_tank(&TankId::new(id)).await?;
    Ok(Json(tank.snapshot()))
}

async fn create_tank<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Json(payload): Json<TankPayload>,
) -> Result<(StatusCode, Json<TankReading>), ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    let id = TankId::new(payload.id.clone());
    let tank = state.tank_service.register_tank(payload.into_tank(id)).await?;
    Ok((StatusCode::CREATED, Json(tank.snapshot())))
}

async fn update_tank<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path(id): Path<String>,
    Json(payload): Json<TankPayload>,
) -> Result<Json<TankReading>, ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    // The path id wins; level data of the stored tank is preserved.
    let id = TankId::new(id);
    let existing = state.tank_service.get_tank(&id).await?;
    let tank = Tank {
        measurement: existing.measurement,
        percentage: existing.percentage,
        sensor_error: existing.sensor_error,
        last_updated: existing.last_updated,
        ..payload.into_tank(id)
    };
    let tank = state.tank_service.update_tank(tank).await?;
    Ok(Json(tank.snapshot()))
}

async fn delete_tank<R, P, B>(
    State(state): State<AppState<R, P, B>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    state.tank_service.delete_tank(&TankId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn broker_settings<R, P, B>(
    State(state): State<AppState<R, P, B>>,
) -> Json<BrokerSettings>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    Json(state.broker.clone())
}

async fn event_stream<R, P, B>(
    State(state): State<AppState<R, P, B>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(|event| {
        // Lagged receivers skip the missed events and carry on.
        let event = event.ok()?;
        let payload = serde_json::to_string(&event).ok()?;
        Some(Ok(SseEvent::default()
            .event(event.kind.to_string())
            .data(payload)))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
