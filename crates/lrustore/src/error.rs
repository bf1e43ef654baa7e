//! Error types for lrustore

use thiserror::Error;

/// Result type alias for lrustore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store construction and validation
///
/// Lookups and inserts on a live store never fail; a missing key is a
/// normal `None`, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Capacity (or max size) is not a positive integer
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal linkage is inconsistent (reported by `check_invariants`)
    #[error("Invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    pub(crate) fn zero_capacity() -> Self {
        Error::Configuration("capacity must be greater than 0".to_string())
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        Error::Invariant(msg.into())
    }
}
