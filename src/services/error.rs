use thiserror::Error;

use crate::database::DatabaseError;

/// Failure of an external collaborator, split by what the caller can do about it
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ServiceError::NotFound(msg),
            DatabaseError::Decode(msg) => ServiceError::ValidationError(msg),
            DatabaseError::Sqlx(sqlx::Error::Database(db_err)) => {
                ServiceError::ValidationError(db_err.message().to_string())
            }
            other => ServiceError::ServiceUnavailable(other.to_string()),
        }
    }
}
