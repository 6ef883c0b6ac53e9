use thiserror::Error;

use crate::database::manager::DatabaseError;

/// Failure kinds returned by every service method. Route handlers turn these
/// into HTTP responses; the services only decide which kind applies.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Entity exists but the caller may not touch it
    #[error("{0}")]
    Forbidden(String),

    /// A write was rejected or changed nothing where a change was expected
    #[error("{0}")]
    Conflict(String),

    /// A foreign reference (e.g. a song id) points at nothing
    #[error("{0}")]
    InvalidReference(String),

    /// Credentials did not check out
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Storage(#[from] DatabaseError),

    #[error("Queue error: {0}")]
    Queue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hashing error: {0}")]
    Password(#[from] bcrypt::BcryptError),
}

impl ServiceError {
    /// Map a failed write: constraint violations become `Conflict` with the
    /// given message, anything else stays a storage failure
    pub fn from_write(err: DatabaseError, conflict_message: &str) -> Self {
        if err.is_constraint_violation() {
            tracing::debug!("write rejected by constraint: {}", err);
            ServiceError::Conflict(conflict_message.to_string())
        } else {
            ServiceError::Storage(err)
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Storage(DatabaseError::Sqlx(err))
    }
}
