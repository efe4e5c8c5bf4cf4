//! Bikeshop Store - SQLite persistence for owners, bikes and revisions
//!
//! Provides:
//! - `StoreConfig`, loaded from code, a TOML file, or the environment
//! - Connection setup with foreign keys enforced
//! - Embedded SQL migrations with checksum verification
//! - `SqliteStore`, implementing the repository contract for all entities

pub mod config;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use config::{ConfigError, StoreConfig};
pub use errors::Result;
pub use repo::SqliteStore;
