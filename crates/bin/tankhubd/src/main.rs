//! # tankhubd — tankhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (TOML file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the repository implementation (adapter)
//! - Construct application services, injecting the repository via port traits
//! - Start measurement sources (virtual, MQTT)
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

use std::sync::Arc;
use std::time::Duration;

use tankhub_adapter_http_axum::state::{AppState, BrokerSettings};
use tankhub_adapter_mqtt::MqttSource;
use tankhub_adapter_storage_sqlite_sqlx::{Config as DbConfig, SqliteTankRepository};
use tankhub_adapter_virtual::VirtualSource;
use tankhub_app::event_bus::InProcessEventBus;
use tankhub_app::ports::MeasurementSource;
use tankhub_app::services::source_context::ServiceContext;
use tankhub_app::services::tank_service::TankService;

mod config;

use config::Config;

/// Interval between synthetic demo measurements.
const DEMO_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DbConfig {
        database_url: config.database.url.clone(),
    }
    .build()
    .await?;
    let repo = SqliteTankRepository::new(db.pool().clone());

    // Event bus
    let event_bus = Arc::new(InProcessEventBus::new(256));

    // Services
    let tank_service = Arc::new(TankService::new(repo, Arc::clone(&event_bus)));
    let ctx = ServiceContext::new(Arc::clone(&tank_service));

    // Measurement sources
    let mut virtual_source = config
        .integrations
        .virtual_enabled
        .then(|| VirtualSource::new(DEMO_INTERVAL, config.integrations.demo_measurements));
    if let Some(source) = virtual_source.as_mut() {
        source.setup(&ctx).await?;
        source.start_background(ctx.clone()).await?;
        tracing::info!(source = source.name(), "measurement source started");
    }

    let mut mqtt_source = config
        .mqtt
        .enabled
        .then(|| MqttSource::new(config.mqtt.connection.clone()));
    if let Some(source) = mqtt_source.as_mut() {
        source.setup(&ctx).await?;
        source.start_background(ctx.clone()).await?;
        tracing::info!(
            source = source.name(),
            broker = %config.mqtt.connection.broker_host,
            "measurement source started"
        );
    }

    // HTTP
    let broker = BrokerSettings {
        broker_host: config.mqtt.connection.broker_host.clone(),
        broker_ws_port: config.mqtt.connection.broker_ws_port,
        data_topic: config.mqtt.connection.data_topic.clone(),
    };
    let state = AppState::from_arcs(tank_service, event_bus, broker);
    let app = tankhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "tankhubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mut source) = mqtt_source {
        if let Err(err) = source.teardown().await {
            tracing::warn!(error = %err, "mqtt source teardown failed");
        }
    }
    if let Some(mut source) = virtual_source {
        if let Err(err) = source.teardown().await {
            tracing::warn!(error = %err, "virtual source teardown failed");
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
