//! Translation of PostgreSQL failures into application errors.

use courthub_core::error::{AppError, ErrorKind, codes};

const UNIQUE_VIOLATION: &str = "23505";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

const IDEMPOTENCY_INDEX: &str = "uq_bookings_idempotency_key";

/// Map a sqlx error, recognising the SQLSTATEs the booking engine reacts to.
///
/// A unique violation on the idempotency index becomes
/// `DUPLICATE_IDEMPOTENCY_KEY`; serialization failures and deadlocks become
/// retryable `SERIALIZATION_FAILURE` conflicts.
pub fn map_sqlx_error(err: sqlx::Error, context: &str) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) if db.constraint() == Some(IDEMPOTENCY_INDEX) => {
                return AppError::with_source(
                    ErrorKind::Conflict,
                    format!("{context}: idempotency key already used"),
                    err,
                )
                .with_code(codes::DUPLICATE_IDEMPOTENCY_KEY);
            }
            Some(UNIQUE_VIOLATION) => {
                return AppError::with_source(
                    ErrorKind::Conflict,
                    format!("{context}: duplicate value"),
                    err,
                );
            }
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                return AppError::with_source(
                    ErrorKind::Conflict,
                    format!("{context}: concurrent update, please retry"),
                    err,
                )
                .with_code(codes::SERIALIZATION_FAILURE);
            }
            _ => {}
        }
    }
    AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_database_kind() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut, "Failed to insert booking");
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(err.code.is_none());
        assert!(err.message.starts_with("Failed to insert booking"));
    }
}
