//! SQLite repository implementation
//!
//! `SqliteStore` owns one connection and implements the repository
//! contract for owners, bikes and revisions.

use bikeshop_core::errors::{missing_field, not_found, ExError, ExErrorKind};
use bikeshop_core::model::{Bike, EntityId, Owner, Revision};
use bikeshop_core::policy::DeletePolicy;
use bikeshop_core::repo::Repository;
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::StoreConfig;
use crate::db;
use crate::errors::{from_rusqlite, from_rusqlite_op, Result};
use crate::migrations::apply_migrations;
use crate::repo::hydration::{
    bike_from_row, owner_from_row, revision_from_row, BIKE_SELECT, OWNER_SELECT, REVISION_SELECT,
};

/// SQLite-backed store for owners, bikes and revisions
pub struct SqliteStore {
    conn: Connection,
    policy: DeletePolicy,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database `config` describes and bring its
    /// schema up to date
    ///
    /// # Errors
    /// `Connection` when the file cannot be opened, `ChecksumMismatch` or
    /// `Persistence` from migrations.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let conn = if config.is_in_memory() {
            db::open_in_memory()?
        } else {
            let conn = db::open(&config.path)?;
            db::enable_wal(&conn)?;
            conn
        };
        let store = Self::from_connection(conn, config)?;
        tracing::debug!(
            path = %config.path.display(),
            delete_policy = %config.delete_policy,
            "opened sqlite store"
        );
        Ok(store)
    }

    /// Fresh in-memory store with the given delete policy
    ///
    /// # Errors
    /// As [`SqliteStore::open`].
    pub fn open_in_memory(policy: DeletePolicy) -> Result<Self> {
        Self::open(&StoreConfig::in_memory().with_delete_policy(policy))
    }

    /// Wrap an already opened connection, configuring and migrating it
    ///
    /// # Errors
    /// As [`SqliteStore::open`].
    pub fn from_connection(mut conn: Connection, config: &StoreConfig) -> Result<Self> {
        db::configure(&conn, config.busy_timeout_ms)?;
        apply_migrations(&mut conn)?;
        Ok(Self {
            conn,
            policy: config.delete_policy,
        })
    }

    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Underlying connection, for inspection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn count(&self, sql: &str, id: EntityId) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row(sql, [id], |row| row.get(0))
            .map_err(from_rusqlite)?;
        Ok(usize::try_from(n).unwrap_or_default())
    }

    fn get_one<T, F>(&self, sql: &str, entity: &'static str, id: EntityId, map: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        self.conn
            .query_row(sql, [id], map)
            .optional()
            .map_err(|e| from_rusqlite_op("get", e))?
            .ok_or_else(|| not_found(entity, id).with_op("get"))
    }

    fn get_many<T, F>(&self, sql: &str, map: F) -> Result<Vec<T>>
    where
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], map)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<T>>>()
            .map_err(|e| from_rusqlite_op("get_all", e))?;
        Ok(rows)
    }
}

/// Attach entity context to a classified rusqlite error
fn store_error(op: &str, entity: &'static str, id: Option<EntityId>, err: rusqlite::Error) -> ExError {
    let ex = from_rusqlite_op(op, err).with_entity(entity);
    match id {
        Some(id) => ex.with_entity_id(id),
        None => ex,
    }
}

fn referential_conflict(entity: &'static str, id: EntityId, children: usize, child: &str) -> ExError {
    ExError::new(ExErrorKind::ReferentialConflict)
        .with_op("delete")
        .with_entity(entity)
        .with_entity_id(id)
        .with_message(format!(
            "Cannot delete {} {}: {} {} record(s) still reference it",
            entity, id, children, child
        ))
}

fn require_id(entity: &'static str, id: Option<EntityId>) -> Result<EntityId> {
    id.ok_or_else(|| missing_field(entity, "id").with_op("update"))
}

fn require_parent(entity: &'static str, field: &str, id: Option<EntityId>, op: &str) -> Result<EntityId> {
    id.ok_or_else(|| missing_field(entity, field).with_op(op))
}

impl Repository<Owner> for SqliteStore {
    fn get(&self, id: EntityId) -> Result<Owner> {
        let sql = format!("{} WHERE o.id = ?1", OWNER_SELECT);
        self.get_one(&sql, Owner::ENTITY, id, owner_from_row)
    }

    fn get_all(&self) -> Result<Vec<Owner>> {
        let sql = format!("{} ORDER BY o.id", OWNER_SELECT);
        self.get_many(&sql, owner_from_row)
    }

    fn save(&mut self, owner: &mut Owner) -> Result<EntityId> {
        self.conn
            .execute(
                "INSERT INTO owners (id, name, surname, phone, email) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![owner.id, owner.name, owner.surname, owner.phone, owner.email],
            )
            .map_err(|e| store_error("save", Owner::ENTITY, owner.id, e))?;
        let id = self.conn.last_insert_rowid();
        owner.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, owner: &Owner) -> Result<()> {
        let id = require_id(Owner::ENTITY, owner.id)?;
        let changed = self
            .conn
            .execute(
                "UPDATE owners SET name = ?2, surname = ?3, phone = ?4, email = ?5 WHERE id = ?1",
                params![id, owner.name, owner.surname, owner.phone, owner.email],
            )
            .map_err(|e| store_error("update", Owner::ENTITY, Some(id), e))?;
        if changed == 0 {
            return Err(not_found(Owner::ENTITY, id).with_op("update"));
        }
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<()> {
        let bikes = self.count("SELECT COUNT(*) FROM bikes WHERE owner_id = ?1", id)?;
        if bikes > 0 {
            return Err(referential_conflict(Owner::ENTITY, id, bikes, Bike::ENTITY));
        }
        let changed = self
            .conn
            .execute("DELETE FROM owners WHERE id = ?1", [id])
            .map_err(|e| store_error("delete", Owner::ENTITY, Some(id), e))?;
        if changed == 0 {
            return Err(not_found(Owner::ENTITY, id).with_op("delete"));
        }
        Ok(())
    }
}

impl Repository<Bike> for SqliteStore {
    fn get(&self, id: EntityId) -> Result<Bike> {
        let sql = format!("{} WHERE b.id = ?1", BIKE_SELECT);
        self.get_one(&sql, Bike::ENTITY, id, bike_from_row)
    }

    fn get_all(&self) -> Result<Vec<Bike>> {
        let sql = format!("{} ORDER BY b.id", BIKE_SELECT);
        self.get_many(&sql, bike_from_row)
    }

    fn save(&mut self, bike: &mut Bike) -> Result<EntityId> {
        let owner_id = require_parent(Bike::ENTITY, "owner_id", bike.owner_id(), "save")?;
        self.conn
            .execute(
                "INSERT INTO bikes (id, brand, model, year, weight, type, carbon, owner_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    bike.id,
                    bike.brand,
                    bike.model,
                    bike.year,
                    bike.weight,
                    bike.bike_type.as_str(),
                    bike.carbon.as_str(),
                    owner_id,
                ],
            )
            .map_err(|e| store_error("save", Bike::ENTITY, bike.id, e))?;
        let id = self.conn.last_insert_rowid();
        bike.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, bike: &Bike) -> Result<()> {
        let id = require_id(Bike::ENTITY, bike.id)?;
        let owner_id = require_parent(Bike::ENTITY, "owner_id", bike.owner_id(), "update")?;
        let changed = self
            .conn
            .execute(
                "UPDATE bikes SET brand = ?2, model = ?3, year = ?4, weight = ?5, type = ?6,
                        carbon = ?7, owner_id = ?8
                 WHERE id = ?1",
                params![
                    id,
                    bike.brand,
                    bike.model,
                    bike.year,
                    bike.weight,
                    bike.bike_type.as_str(),
                    bike.carbon.as_str(),
                    owner_id,
                ],
            )
            .map_err(|e| store_error("update", Bike::ENTITY, Some(id), e))?;
        if changed == 0 {
            return Err(not_found(Bike::ENTITY, id).with_op("update"));
        }
        Ok(())
    }

    /// Under `Cascade` the bike's revisions are removed in the same
    /// transaction; a failure leaves every row in place.
    fn delete(&mut self, id: EntityId) -> Result<()> {
        let revisions = self.count("SELECT COUNT(*) FROM revisions WHERE bike_id = ?1", id)?;
        if revisions > 0 && !self.policy.cascades_revisions() {
            return Err(referential_conflict(
                Bike::ENTITY,
                id,
                revisions,
                Revision::ENTITY,
            ));
        }

        let tx = self.conn.transaction().map_err(from_rusqlite)?;
        let removed = tx
            .execute("DELETE FROM revisions WHERE bike_id = ?1", [id])
            .map_err(|e| store_error("delete", Revision::ENTITY, None, e))?;
        let changed = tx
            .execute("DELETE FROM bikes WHERE id = ?1", [id])
            .map_err(|e| store_error("delete", Bike::ENTITY, Some(id), e))?;
        if changed == 0 {
            // tx drops here and rolls back
            return Err(not_found(Bike::ENTITY, id).with_op("delete"));
        }
        tx.commit().map_err(from_rusqlite)?;

        if removed > 0 {
            tracing::debug!(bike_id = id, revisions = removed, "cascaded bike delete");
        }
        Ok(())
    }
}

impl Repository<Revision> for SqliteStore {
    fn get(&self, id: EntityId) -> Result<Revision> {
        let sql = format!("{} WHERE r.id = ?1", REVISION_SELECT);
        self.get_one(&sql, Revision::ENTITY, id, revision_from_row)
    }

    fn get_all(&self) -> Result<Vec<Revision>> {
        let sql = format!("{} ORDER BY r.id", REVISION_SELECT);
        self.get_many(&sql, revision_from_row)
    }

    fn save(&mut self, revision: &mut Revision) -> Result<EntityId> {
        let bike_id = require_parent(Revision::ENTITY, "bike_id", revision.bike_id(), "save")?;
        self.conn
            .execute(
                "INSERT INTO revisions (id, date, description, price, bike_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    revision.id,
                    revision.date,
                    revision.description,
                    revision.price,
                    bike_id,
                ],
            )
            .map_err(|e| store_error("save", Revision::ENTITY, revision.id, e))?;
        let id = self.conn.last_insert_rowid();
        revision.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, revision: &Revision) -> Result<()> {
        let id = require_id(Revision::ENTITY, revision.id)?;
        let bike_id = require_parent(Revision::ENTITY, "bike_id", revision.bike_id(), "update")?;
        let changed = self
            .conn
            .execute(
                "UPDATE revisions SET date = ?2, description = ?3, price = ?4, bike_id = ?5
                 WHERE id = ?1",
                params![
                    id,
                    revision.date,
                    revision.description,
                    revision.price,
                    bike_id,
                ],
            )
            .map_err(|e| store_error("update", Revision::ENTITY, Some(id), e))?;
        if changed == 0 {
            return Err(not_found(Revision::ENTITY, id).with_op("update"));
        }
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM revisions WHERE id = ?1", [id])
            .map_err(|e| store_error("delete", Revision::ENTITY, Some(id), e))?;
        if changed == 0 {
            return Err(not_found(Revision::ENTITY, id).with_op("delete"));
        }
        Ok(())
    }
}
