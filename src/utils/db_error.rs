//! Helpers for classifying database errors.

/// Name of the unique constraint guarding `mappings.code`.
pub const CODE_UNIQUE_CONSTRAINT: &str = "mappings_code_key";

/// Returns true when `e` is a unique violation on the mapping code.
///
/// Violations of any other constraint are not treated as code collisions.
pub fn is_unique_violation_on_code(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some(CODE_UNIQUE_CONSTRAINT))
}
