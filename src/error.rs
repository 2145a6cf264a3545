//! Crate-wide error type.
//!
//! Structural operations (set insert, stack pop, index lookup) fail
//! immediately to their direct caller with one of these variants. Batch
//! operations (attendance drain) catch per-entry failures and report them
//! through [`crate::registry::IngestReport`] instead of propagating.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Error cases surfaced by the records core.
#[derive(Error, Debug)]
pub enum Error {
    /// A key (student ID, subject code) is already present where
    /// uniqueness is required.
    #[error("duplicate {entity}: {key}")]
    DuplicateKey { entity: &'static str, key: String },

    /// A referenced key (student ID, subject code) does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Input rejected by a domain rule (year range, score range,
    /// interval bounds, negative weight).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Pop/peek/dequeue on an empty stack or queue.
    #[error("empty {0}")]
    EmptyStructure(&'static str),

    /// Persistence adapter failure that could not be absorbed by the
    /// quarantine fallback.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl Error {
    pub(crate) fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Error::DuplicateKey {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}
