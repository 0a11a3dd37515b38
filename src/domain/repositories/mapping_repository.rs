//! Repository trait for mapping persistence.

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::errors::StoreError;
use async_trait::async_trait;

/// Store contract consumed by the coordinator.
///
/// Implementations must enforce uniqueness of `code` atomically: when two
/// inserts race on the same code, exactly one succeeds and every other one
/// returns [`StoreError::Conflict`]. [`MappingRepository::exists`] is only a
/// hint and may be stale by the time an insert runs.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgMappingRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryMappingRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Checks whether a mapping with this code is already stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when the store cannot be reached.
    async fn exists(&self, code: &str) -> Result<bool, StoreError>;

    /// Persists a new mapping and returns it with its storage-assigned fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the code is already taken.
    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError>;

    /// Finds a mapping by exact code match.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Mapping))` if found
    /// - `Ok(None)` if not found
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError>;

    /// Verifies the store answers queries.
    async fn ping(&self) -> Result<(), StoreError>;
}
