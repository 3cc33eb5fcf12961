//! Server-side rendered dashboard (no JavaScript).
//!
//! One page, rebuilt on every request from the current snapshots and
//! auto-reloaded via `<meta http-equiv="refresh">`.

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;

use tankhub_app::ports::{EventPublisher, EventSubscriber, TankRepository};

use crate::error::ApiError;
use crate::state::AppState;
use crate::templates;

/// Seconds between dashboard auto-reloads.
const REFRESH_SECS: u16 = 5;

/// Assemble the dashboard sub-router.
pub fn routes<R, P, B>() -> Router<AppState<R, P, B>>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    Router::new().route("/", get(home))
}

async fn home<R, P, B>(State(state): State<AppState<R, P, B>>) -> Result<Html<String>, ApiError>
where
    R: TankRepository + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    B: EventSubscriber + Send + Sync + 'static,
{
    let readings = state.tank_service.list_readings().await?;
    Ok(Html(templates::dashboard_page(&readings, REFRESH_SECS)))
}
