use crate::database::DatabaseError;
use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;
use thiserror::Error;

/// Application-level error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Database setup errors (pool creation, migrations)
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// SQLx database errors
    #[error("SQL error: {0}")]
    Sqlx(#[from] SqlxError),

    /// Underlying store unreachable; surfaced as-is, never retried
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed input rejected before it reaches the store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Price source errors
    #[error("Price source error: {0}")]
    PriceSource(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored amounts or timestamps that no longer parse
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// File system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Check if the store could not be reached
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(
            self,
            AppError::StorageUnavailable(_)
                | AppError::Database(DatabaseError::PoolCreation(_))
                | AppError::Database(DatabaseError::ConnectionTimeout)
        )
    }

    /// Check if error is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Check if error is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

/// Repository-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Database query error
    #[error("Query error: {0}")]
    Query(SqlxError),

    /// Pool closed, timed out, or the database file is unreachable
    #[error("Store unavailable: {0}")]
    Unavailable(SqlxError),

    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Duplicate record
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// Constraint violation (CHECK / NOT NULL)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Row contents that cannot be mapped back into a model
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => AppError::NotFound(msg),
            RepositoryError::Query(e) => AppError::Sqlx(e),
            RepositoryError::Unavailable(e) => AppError::StorageUnavailable(e.to_string()),
            RepositoryError::Duplicate(msg) => AppError::Validation(format!("Duplicate: {}", msg)),
            RepositoryError::ConstraintViolation(msg) => AppError::Validation(msg),
            RepositoryError::InvalidData(msg) => AppError::InvalidData(msg),
        }
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match &err {
            SqlxError::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) => {
                RepositoryError::Unavailable(err)
            }
            SqlxError::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    RepositoryError::Duplicate(db_err.message().to_string())
                }
                ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation => {
                    RepositoryError::ConstraintViolation(db_err.message().to_string())
                }
                _ => RepositoryError::Query(err),
            },
            _ => RepositoryError::Query(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_are_unavailable() {
        let err: AppError = RepositoryError::from(SqlxError::PoolTimedOut).into();
        assert!(err.is_storage_unavailable());

        let err: AppError = RepositoryError::from(SqlxError::PoolClosed).into();
        assert!(matches!(err, AppError::StorageUnavailable(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: AppError = RepositoryError::from(SqlxError::RowNotFound).into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_constraint_violation_is_validation() {
        let err: AppError = RepositoryError::ConstraintViolation("CHECK failed".into()).into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: CHECK failed");
    }
}
