//! # tankhub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement (driven/outbound ports):
//!   - `TankRepository` — persistence for tank configuration + level data
//!   - `EventPublisher` / `EventSubscriber` — domain event fan-out
//!   - `MeasurementSource` / `SourceContext` — sensor ingestion lifecycle
//! - Provide the **use-case service** (`TankService`): tank CRUD, reading
//!   snapshots, and measurement application
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `tankhub-domain` only (plus `tokio::sync` for channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
