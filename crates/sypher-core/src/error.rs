//! Error taxonomy for goal operations.
//!
//! The engine itself only produces [`GoalError::InvalidArgument`] and
//! [`GoalError::Validation`]. `NotFound` and `Conflict` are raised by
//! [`GoalStore`](crate::store::GoalStore) implementations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalError {
    /// Input to an engine operation breaks a goal invariant, e.g. a `now`
    /// earlier than the goal's creation time.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// User-supplied fields failed validation (empty title, empty user id).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("goal not found: {0}")]
    NotFound(String),

    /// A compare-and-swap update found a newer version in the store.
    #[error("goal {0} was modified concurrently")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, GoalError>;
