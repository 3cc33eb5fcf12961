//! # tankhub-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in
//!   `tankhub-app::ports::storage`
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `tankhub-app` (for port traits) and `tankhub-domain` (for
//! domain types). The `app` and `domain` crates must never reference this
//! adapter.

pub mod error;
pub mod pool;
pub mod tank_repo;

pub use error::StorageError;
pub use pool::{Config, Database};
pub use tank_repo::SqliteTankRepository;
