//! # tankhub-domain
//!
//! Pure domain model for the tankhub water-tank monitoring system.
//!
//! ## Responsibilities
//! - Foundational types: tank identifiers, error conventions, timestamps
//! - Define **Tanks** (configuration: geometry, sensor wiring, thresholds)
//! - Define **Readings** (immutable display snapshots of a tank's level)
//! - Classify readings into **level states** (`normal`, `warning`, …)
//! - Convert raw sensor measurements into fill percentages
//! - Define **Events** (reading/configuration change records)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod event;
pub mod geometry;
pub mod id;
pub mod level;
pub mod reading;
pub mod tank;
pub mod time;
