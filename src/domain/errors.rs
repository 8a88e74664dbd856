//! Domain errors for the tether upgrade flow.
//!
//! Classified provider failures travel through the outcome taxonomy,
//! not through this type; these errors cover the conflict-decision
//! surface itself.

use thiserror::Error;

/// Domain-level errors that can occur in the tether system.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("No conflict decision is active")]
    NoActiveConflict,

    #[error(
        "The merge branch is not implemented; resolve the conflict by \
         signing in to the existing account or cancelling"
    )]
    MergeUnsupported,
}

pub type DomainResult<T> = Result<T, DomainError>;
