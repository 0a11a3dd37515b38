//! Error taxonomy shared by the store contract and the coordinator.

use thiserror::Error;

/// Failures reported by a [`crate::domain::repositories::MappingRepository`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The code is already taken. Raised by the uniqueness constraint at insert time.
    #[error("code already exists: {0}")]
    Conflict(String),

    /// The store could not be reached (connection failure, pool timeout, I/O).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),

    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

/// Outcomes of the coordinator other than success.
///
/// `Conflict` never appears here: collisions are retried inside
/// [`crate::application::services::MappingService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No mapping exists for the code. An expected outcome, not a store failure.
    #[error("no mapping found for code: {code}")]
    NotFound { code: String },

    /// Every attempt produced a colliding candidate.
    #[error("could not allocate a unique code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    /// The caller's deadline passed between attempts.
    #[error("deadline exceeded after {attempts} attempts")]
    DeadlineExceeded { attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_converts_into_core_error() {
        let err: CoreError = StoreError::Unavailable("pool timed out".into()).into();

        assert!(matches!(err, CoreError::Store(StoreError::Unavailable(_))));
        assert_eq!(err.to_string(), "store unavailable: pool timed out");
    }
}
