//! Subcommands and the plumbing they share

pub mod bike;
pub mod owner;
pub mod revision;

use std::path::PathBuf;

use bikeshop_core::errors::{ExError, ExErrorKind, Result};
use bikeshop_store::{SqliteStore, StoreConfig};
use clap::Args;
use serde::Serialize;

/// Flags accepted before the entity subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Database file (overrides config file and BIKESHOP_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Emit structured JSON logs on stderr
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    /// Resolve the store config: file (or defaults), then environment, then `--db`
    pub fn store_config(&self) -> Result<StoreConfig> {
        let base = match &self.config {
            Some(path) => StoreConfig::from_toml_file(path)?,
            None => StoreConfig::default(),
        };
        let mut config = base.with_env_overrides()?;
        if let Some(db) = &self.db {
            config.path = db.clone();
        }
        Ok(config)
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        let config = self.store_config()?;
        tracing::debug!(
            path = %config.path.display(),
            delete_policy = %config.delete_policy,
            "opening store"
        );
        SqliteStore::open(&config)
    }
}

/// Print `value` as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        ExError::new(ExErrorKind::Internal)
            .with_op("print_json")
            .with_message(e.to_string())
    })?;
    println!("{}", text);
    Ok(())
}

/// Confirmation for a delete, in either output mode
pub fn print_deleted(global: &GlobalArgs, entity: &str, id: i64) -> Result<()> {
    if global.json {
        print_json(&serde_json::json!({ "deleted": id, "entity": entity }))
    } else {
        println!("Deleted {} {}", entity, id);
        Ok(())
    }
}
