//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`TankHubError`] via `#[from]` — no `String` variants.

/// Violation of a domain invariant.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Tank identifiers key sensor payloads and dashboard rows.
    #[error("tank id must not be empty")]
    EmptyTankId,

    #[error("tank label must not be empty")]
    EmptyLabel,

    #[error("sensor topic must not be empty")]
    EmptySensorTopic,

    /// A geometry dimension (width, height, diameter, …) was zero or
    /// negative.
    #[error("tank dimension '{0}' must be positive")]
    NonPositiveDimension(&'static str),

    #[error("tank geometry is required")]
    MissingGeometry,
}

/// A lookup failed to find the requested record.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    /// Kind of record, e.g. `"Tank"`.
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}

/// Base error for the whole workspace.
#[derive(Debug, thiserror::Error)]
pub enum TankHubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Failure in a storage or transport adapter, boxed to keep the domain
    /// free of adapter types.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}
