//! Translation of pool and Diesel failures into store port errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::CityRepositoryError;

use super::pool::PoolError;

/// Any pool failure means the database is unreachable.
pub(super) fn map_pool_error(error: PoolError) -> CityRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            CityRepositoryError::connection(message)
        }
    }
}

/// Classify a Diesel failure.
///
/// Serialization failures and foreign-key violations mean another
/// transaction changed the rows this one depended on, so they surface as
/// stale changes rather than query errors.
pub(super) fn map_diesel_error(error: DieselError) -> CityRepositoryError {
    if let DieselError::DatabaseError(kind, info) = &error {
        debug!(?kind, message = info.message(), "diesel operation failed");
    } else {
        debug!(%error, "diesel operation failed");
    }

    match error {
        DieselError::NotFound => CityRepositoryError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            CityRepositoryError::connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            CityRepositoryError::stale_change("concurrent transaction conflict")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            CityRepositoryError::stale_change("referenced city no longer exists")
        }
        DieselError::QueryBuilderError(_) => CityRepositoryError::query("database query error"),
        _ => CityRepositoryError::query("database error"),
    }
}
