//! Shared helpers for the Diesel repositories.
//!
//! Each repository port has its own error enum, but all of them carry
//! `Connection` and `Query` variants. [`StorageFault`] lets the mapping from
//! pool and Diesel errors be written once.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::ports::{PostPersistenceError, QuestionPersistenceError, UserPersistenceError};

/// Port errors that can describe infrastructure faults.
pub(crate) trait StorageFault {
    fn connection(message: String) -> Self;
    fn query(message: String) -> Self;
}

macro_rules! impl_storage_fault {
    ($($error:ty),* $(,)?) => {
        $(
            impl StorageFault for $error {
                fn connection(message: String) -> Self {
                    <$error>::connection(message)
                }

                fn query(message: String) -> Self {
                    <$error>::query(message)
                }
            }
        )*
    };
}

impl_storage_fault!(
    UserPersistenceError,
    PostPersistenceError,
    QuestionPersistenceError
);

/// Map a pool failure to the caller's port error.
pub(crate) fn map_pool_error<E: StorageFault>(error: PoolError) -> E {
    E::connection(error.message().to_owned())
}

/// Map a Diesel failure to the caller's port error, logging the raw cause.
pub(crate) fn map_diesel_error<E: StorageFault>(error: DieselError, operation: &str) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), operation, "diesel operation failed");
        }
        other => debug!(error = %other, operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            E::connection("database connection error".to_owned())
        }
        DieselError::NotFound => E::query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => E::query("database query error".to_owned()),
        _ => E::query("database error".to_owned()),
    }
}

/// Whether `error` is a unique-constraint violation.
pub(crate) fn is_unique_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// Whether `error` is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(error: &DieselError) -> bool {
    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)
    )
}

/// Collect row conversion results, mapping the first failure through `map_err`.
pub(crate) fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}
