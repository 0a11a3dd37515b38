//! PostgreSQL implementation of the mapping repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::errors::StoreError;
use crate::domain::repositories::MappingRepository;
use crate::utils::db_error::is_unique_violation_on_code;

/// PostgreSQL repository for mapping storage and retrieval.
///
/// The `mappings_code_key` unique constraint is the authority on code
/// uniqueness; [`MappingRepository::exists`] only saves a doomed insert.
pub struct PgMappingRepository {
    pool: Arc<PgPool>,
}

impl PgMappingRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Removes a mapping by code. Administrative, outside the store contract.
    ///
    /// Returns `Ok(true)` if a row was deleted.
    pub async fn delete_by_code(&self, code: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM mappings WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all stored mappings.
    pub async fn count(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mappings")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }
}

/// Classifies a sqlx error into the store error taxonomy.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_) => StoreError::InvalidData(message),
        _ => StoreError::Query(message),
    }
}

#[async_trait]
impl MappingRepository for PgMappingRepository {
    async fn exists(&self, code: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM mappings WHERE code = $1)")
            .bind(code)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, StoreError> {
        let result = sqlx::query_as::<_, Mapping>(
            r#"
            INSERT INTO mappings (code, original_url)
            VALUES ($1, $2)
            RETURNING id, code, original_url, created_at
            "#,
        )
        .bind(&new_mapping.code)
        .bind(&new_mapping.original_url)
        .fetch_one(self.pool.as_ref())
        .await;

        match result {
            Ok(mapping) => Ok(mapping),
            Err(err) if is_unique_violation_on_code(&err) => {
                Err(StoreError::Conflict(new_mapping.code))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>, StoreError> {
        sqlx::query_as::<_, Mapping>(
            r#"
            SELECT id, code, original_url, created_at
            FROM mappings
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn test_decode_errors_are_invalid_data() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::ColumnNotFound("code".into())),
            StoreError::InvalidData(_)
        ));
    }

    #[test]
    fn test_other_errors_are_query_failures() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
    }
}
