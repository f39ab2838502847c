//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from dataset loading and HTTP errors.

use super::RouteId;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// A route's stop list is not ordered by sequence number
    #[error("route {0} has stop sequence numbers that do not strictly increase")]
    StopSequenceNotIncreasing(RouteId),

    /// A route references a stop the dataset does not define
    #[error("route {route} references unknown stop {stop}")]
    UnknownStop { route: RouteId, stop: String },
}
