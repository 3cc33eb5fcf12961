//! # tankhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for programmatic access (`/api/tanks`,
//!   `/api/broker`, `/api/events`)
//! - Serve a **server-side-rendered HTML dashboard** that works with zero
//!   JavaScript — complete pages with `<meta http-equiv="refresh">` for
//!   live updates
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application results into HTTP responses (JSON or HTML)
//!
//! ## Row replacement
//! Every dashboard table row carries the tank id as its `id` attribute and
//! every `reading_updated` SSE event carries the fresh snapshot, so a
//! richer client can locate a row and replace it wholesale when its tank's
//! update arrives. The built-in dashboard simply re-renders the whole page
//! on refresh.
//!
//! ## Dependency rule
//! Depends on `tankhub-app` (for port traits and services) and
//! `tankhub-domain` (for domain types used in request/response mapping).
//! Never leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
pub mod templates;
