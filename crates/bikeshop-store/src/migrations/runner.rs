//! Migration runner
//!
//! Applies migrations in order, each in its own transaction, and verifies
//! the checksums of migrations applied earlier.

use rusqlite::{Connection, OptionalExtension};

use crate::errors::{from_rusqlite, migration_error, Result};
use crate::migrations::checksums::{compute_checksum, verify_checksum};
use crate::migrations::embedded::{get_migrations, Migration};

/// Apply all pending embedded migrations to the database
///
/// # Errors
/// `ChecksumMismatch` when an applied migration was edited afterwards,
/// `Persistence` when a migration fails to run.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    apply_migrations_from(conn, &get_migrations())
}

/// Apply the given migrations, in order
///
/// # Errors
/// As [`apply_migrations`].
pub fn apply_migrations_from(conn: &mut Connection, migrations: &[Migration]) -> Result<()> {
    create_schema_version_table(conn)?;

    for migration in migrations {
        apply_migration(conn, migration)?;
    }

    Ok(())
}

/// Ids of applied migrations, in application order
///
/// # Errors
/// `Persistence` when `schema_version` cannot be read.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT migration_id FROM schema_version ORDER BY id")
        .map_err(from_rusqlite)?;
    let ids = stmt
        .query_map([], |row| row.get(0))
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<String>, _>>()
        .map_err(from_rusqlite)?;
    Ok(ids)
}

/// Create the schema_version table if it doesn't exist
fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY,
            migration_id TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL,
            checksum TEXT
        )",
        [],
    )
    .map_err(from_rusqlite)?;

    Ok(())
}

/// Apply a single migration if not already applied
fn apply_migration(conn: &mut Connection, migration: &Migration) -> Result<()> {
    let recorded: Option<Option<String>> = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = ?1",
            [migration.id],
            |row| row.get(0),
        )
        .optional()
        .map_err(from_rusqlite)?;

    if let Some(checksum) = recorded {
        return verify_checksum(migration.id, checksum.as_deref(), migration.sql);
    }

    let checksum = compute_checksum(migration.sql);
    let tx = conn.transaction().map_err(from_rusqlite)?;

    tx.execute_batch(migration.sql)
        .map_err(|e| migration_error(migration.id, &e.to_string()))?;

    let now = chrono::Utc::now().timestamp();
    tx.execute(
        "INSERT INTO schema_version (migration_id, applied_at, checksum) VALUES (?1, ?2, ?3)",
        rusqlite::params![migration.id, now, checksum],
    )
    .map_err(from_rusqlite)?;

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(migration_id = migration.id, "applied migration");
    Ok(())
}
