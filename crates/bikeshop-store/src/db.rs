//! Database connection management
//!
//! Provides utilities for opening and managing SQLite connections

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::errors::{from_rusqlite, from_rusqlite_op, Result};

/// Open a SQLite database at the given path, creating the file if needed
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(|e| from_rusqlite_op("open", e))
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(|e| from_rusqlite_op("open", e))
}

/// Configure a connection for use by the store
///
/// Foreign keys are off by default in SQLite and must be enabled on every
/// connection.
pub fn configure(conn: &Connection, busy_timeout_ms: u64) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    conn.busy_timeout(Duration::from_millis(busy_timeout_ms))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Switch a file-backed database to WAL journaling
///
/// Returns the journal mode now in effect. In-memory databases stay in
/// "memory" mode whatever is asked.
pub fn enable_wal(conn: &Connection) -> Result<String> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
        .map_err(from_rusqlite)
}

/// True when foreign key enforcement is active on this connection
pub fn foreign_keys_enabled(conn: &Connection) -> Result<bool> {
    conn.query_row("PRAGMA foreign_keys", [], |row| row.get::<_, i64>(0))
        .map(|v| v == 1)
        .map_err(from_rusqlite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_enables_foreign_keys() {
        let conn = open_in_memory().unwrap();
        // The bundled build may default enforcement on; start from off
        conn.execute_batch("PRAGMA foreign_keys = OFF").unwrap();
        assert!(!foreign_keys_enabled(&conn).unwrap());
        configure(&conn, 1000).unwrap();
        assert!(foreign_keys_enabled(&conn).unwrap());
    }
}
