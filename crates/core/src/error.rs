use crate::indent::IndentStatus;
use crate::types::RecordId;

/// Domain-level error for the indent workflow.
///
/// Every variant is scoped to a single request's transition attempt; none is
/// fatal to the process. `Validation` and `StaleState` are recoverable by
/// re-fetching current state and retrying with corrected input.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The stored status no longer matches the `expected_from` the caller
    /// observed. Raised instead of applying the write, so two approvers
    /// racing on the same request resolve to exactly one winner.
    #[error("Stale state: expected status {expected} but found {actual}")]
    StaleState {
        expected: IndentStatus,
        actual: IndentStatus,
    },

    /// The acting role is not allowed to perform the attempted transition.
    #[error("Forbidden transition: {0}")]
    ForbiddenTransition(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Underlying persistence or network failure.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
