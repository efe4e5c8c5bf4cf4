//! Error handling for bikeshop-store
//!
//! Wraps bikeshop-core ExError with store-specific helpers

use bikeshop_core::errors::{ExError, ExErrorKind};
use rusqlite::ffi;
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ChecksumMismatch)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    from_rusqlite_op("sqlite", err)
}

/// Classify a rusqlite::Error raised while running `op`
///
/// Foreign-key failures mean different things depending on the operation:
/// a missing parent on `save`/`update`, surviving children on `delete`.
pub fn from_rusqlite_op(op: &str, err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY if op == "delete" => {
                    ExErrorKind::ReferentialConflict
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ExErrorKind::ParentNotFound,
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    ExErrorKind::DuplicateKey
                }
                ffi::SQLITE_CONSTRAINT_NOTNULL => ExErrorKind::MissingField,
                _ => ExErrorKind::Persistence,
            },
            ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::PermissionDenied => {
                ExErrorKind::Connection
            }
            _ => ExErrorKind::Persistence,
        },
        rusqlite::Error::QueryReturnedNoRows => ExErrorKind::NotFound,
        rusqlite::Error::InvalidPath(_) => ExErrorKind::Connection,
        _ => ExErrorKind::Persistence,
    };

    ExError::new(kind).with_op(op).with_message(err.to_string())
}
