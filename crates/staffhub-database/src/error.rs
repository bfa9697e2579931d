//! Classification of PostgreSQL errors into application error kinds.
//!
//! Integrity violations are caller mistakes, not server failures: a
//! missing referenced row on insert is a bad request, a row that is still
//! referenced on delete is a conflict.

use sqlx::{PgPool, Postgres, Transaction};

use staffhub_core::error::{AppError, ErrorKind};

/// SQLSTATE for `foreign_key_violation`.
pub const FOREIGN_KEY_VIOLATION: &str = "23503";
/// SQLSTATE for `unique_violation`.
pub const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `check_violation`.
pub const CHECK_VIOLATION: &str = "23514";
/// SQLSTATE for `not_null_violation`.
pub const NOT_NULL_VIOLATION: &str = "23502";
/// SQLSTATE for `invalid_text_representation` (bad enum or UUID literal).
pub const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// The kind of statement that failed, which decides how foreign-key
/// violations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOperation {
    /// INSERT.
    Create,
    /// UPDATE.
    Update,
    /// DELETE.
    Delete,
    /// SELECT.
    Read,
}

/// Map a SQLSTATE code to an error kind and client-facing message.
///
/// Returns `None` for codes that are not client errors.
pub fn classify_pg_code(code: &str, op: DbOperation) -> Option<(ErrorKind, &'static str)> {
    match (code, op) {
        (FOREIGN_KEY_VIOLATION, DbOperation::Delete) => Some((
            ErrorKind::Conflict,
            "Record is still referenced by other records",
        )),
        (FOREIGN_KEY_VIOLATION, _) => {
            Some((ErrorKind::Validation, "Referenced record does not exist"))
        }
        (UNIQUE_VIOLATION, _) => Some((ErrorKind::Conflict, "Record already exists")),
        (CHECK_VIOLATION, _) => Some((ErrorKind::Validation, "Value violates a check constraint")),
        (NOT_NULL_VIOLATION, _) => Some((ErrorKind::Validation, "A required field is missing")),
        (INVALID_TEXT_REPRESENTATION, _) => {
            Some((ErrorKind::Validation, "Invalid value for field type"))
        }
        _ => None,
    }
}

/// Wrap a sqlx error, classifying integrity violations by SQLSTATE.
pub fn db_error(err: sqlx::Error, op: DbOperation, context: &str) -> AppError {
    let classified = err
        .as_database_error()
        .and_then(|db| db.code())
        .and_then(|code| classify_pg_code(&code, op));

    match classified {
        Some((kind, reason)) => {
            AppError::with_source(kind, format!("{context}: {reason}"), err)
        }
        None => AppError::with_source(ErrorKind::Database, context.to_string(), err),
    }
}

/// Begin a transaction.
pub async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, AppError> {
    pool.begin()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
}

/// Commit a transaction.
pub async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), AppError> {
    tx.commit()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_key_depends_on_operation() {
        let (kind, _) = classify_pg_code("23503", DbOperation::Create).unwrap();
        assert_eq!(kind, ErrorKind::Validation);
        let (kind, _) = classify_pg_code("23503", DbOperation::Update).unwrap();
        assert_eq!(kind, ErrorKind::Validation);
        let (kind, msg) = classify_pg_code("23503", DbOperation::Delete).unwrap();
        assert_eq!(kind, ErrorKind::Conflict);
        assert!(msg.contains("still referenced"));
    }

    #[test]
    fn test_unique_and_check() {
        assert_eq!(
            classify_pg_code("23505", DbOperation::Create).map(|c| c.0),
            Some(ErrorKind::Conflict)
        );
        assert_eq!(
            classify_pg_code("23514", DbOperation::Create).map(|c| c.0),
            Some(ErrorKind::Validation)
        );
    }

    #[test]
    fn test_other_codes_are_not_classified() {
        assert!(classify_pg_code("40001", DbOperation::Update).is_none());
        assert!(classify_pg_code("08006", DbOperation::Read).is_none());
    }

    #[test]
    fn test_non_database_error_maps_to_database_kind() {
        let err = db_error(sqlx::Error::RowNotFound, DbOperation::Read, "Failed to load task");
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "Failed to load task");
    }
}
