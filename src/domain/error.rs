//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed hierarchies.
/// The core has exactly one failure: the edges describe a cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("cycle detected in hierarchy")]
    CycleDetected,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
