//! Error types for the voting engine

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Engine-level failures, independent of any transport status code.
///
/// Expected, common outcomes (duplicate add, remove of an unknown song)
/// are boolean results on the operations themselves, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid user input, e.g. a vote naming the same song twice
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced song is absent from the pool
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation requires pool state that does not hold
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
