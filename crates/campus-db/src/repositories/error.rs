//! Error handling utilities for repositories

use campus_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if is_unique_violation(&e) {
        return on_unique();
    }
    DomainError::DatabaseError(e.to_string())
}

/// True when the database rejected a write because of a unique constraint
pub fn is_unique_violation(e: &SqlxError) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
