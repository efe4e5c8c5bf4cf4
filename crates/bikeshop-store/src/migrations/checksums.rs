//! Checksum validation for migrations
//!
//! A migration body must never change once applied. Its SHA-256 is stored
//! in `schema_version` and compared on every open.

use sha2::{Digest, Sha256};

use crate::errors::{checksum_mismatch, Result};

/// Hex SHA-256 of a migration body
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

/// Compare a recorded checksum with the current migration body
///
/// Rows recorded without a checksum are accepted as-is.
pub fn verify_checksum(migration_id: &str, recorded: Option<&str>, sql: &str) -> Result<()> {
    let actual = compute_checksum(sql);
    match recorded {
        Some(expected) if expected != actual => {
            Err(checksum_mismatch(migration_id, expected, &actual))
        }
        _ => Ok(()),
    }
}
