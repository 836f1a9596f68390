//! Error classification shared by the Diesel repositories.
//!
//! Each repository port has its own error enum; these helpers reduce pool and
//! Diesel failures to a [`StorageFailure`] that the repositories convert with
//! a one-line `From` impl.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{CommentRepositoryError, ListingRepositoryError};

use super::pool::PoolError;

/// Storage failure reduced to the categories the ports distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFailure {
    Connection(String),
    Query(String),
    /// A foreign key pointed at a row that does not exist.
    MissingReference(String),
}

pub(crate) fn classify_pool_error(error: PoolError) -> StorageFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StorageFailure::Connection(message)
        }
    }
}

/// Classify a Diesel error, logging the database-level detail at debug.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> StorageFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            StorageFailure::MissingReference(format!("{operation}: referenced row missing"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            StorageFailure::Query(format!("{operation}: check constraint violated"))
        }
        DieselError::QueryBuilderError(_) => {
            StorageFailure::Query(format!("{operation}: database query error"))
        }
        _ => StorageFailure::Query(format!("{operation}: database error")),
    }
}

impl From<StorageFailure> for ListingRepositoryError {
    fn from(value: StorageFailure) -> Self {
        match value {
            StorageFailure::Connection(message) => Self::connection(message),
            StorageFailure::Query(message) | StorageFailure::MissingReference(message) => {
                Self::query(message)
            }
        }
    }
}

impl From<StorageFailure> for CommentRepositoryError {
    fn from(value: StorageFailure) -> Self {
        match value {
            StorageFailure::Connection(message) => Self::connection(message),
            StorageFailure::Query(message) => Self::query(message),
            StorageFailure::MissingReference(message) => Self::missing_listing(message),
        }
    }
}
