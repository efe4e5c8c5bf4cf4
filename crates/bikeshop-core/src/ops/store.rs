use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::errors::{missing_field, not_found, ExError, ExErrorKind, Result};
use crate::model::{Bike, BikeType, Carbon, EntityId, Owner, Revision};
use crate::policy::DeletePolicy;
use crate::repo::Repository;

#[derive(Debug, Clone, PartialEq)]
struct BikeRow {
    brand: String,
    model: String,
    year: i32,
    weight: f64,
    bike_type: BikeType,
    carbon: Carbon,
    owner_id: EntityId,
}

#[derive(Debug, Clone, PartialEq)]
struct RevisionRow {
    date: NaiveDate,
    description: String,
    price: f64,
    bike_id: EntityId,
}

/// Monotonic id source that never reuses an id, even after deletes
#[derive(Debug, Clone, Copy)]
struct IdSequence {
    next: EntityId,
}

impl Default for IdSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdSequence {
    fn allocate(&mut self, entity: &'static str) -> Result<EntityId> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(|| ids_exhausted(entity, id))?;
        Ok(id)
    }

    /// Record an explicitly chosen id so later allocations skip past it
    ///
    /// The last representable id is refused: accepting it would leave no
    /// id for the next allocation.
    fn observe(&mut self, entity: &'static str, id: EntityId) -> Result<()> {
        if id >= self.next {
            self.next = id.checked_add(1).ok_or_else(|| ids_exhausted(entity, id))?;
        }
        Ok(())
    }
}

/// In-memory store for owners, bikes and revisions
///
/// Rows are kept flat, with parents referenced by id, and hydrated on every
/// read, so a bike always reflects its owner's current values. Foreign keys
/// and the delete policy are enforced the same way the SQLite store
/// enforces them.
///
/// Not thread-safe; designed for single-threaded use and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    owners: BTreeMap<EntityId, Owner>,
    bikes: BTreeMap<EntityId, BikeRow>,
    revisions: BTreeMap<EntityId, RevisionRow>,
    owner_ids: IdSequence,
    bike_ids: IdSequence,
    revision_ids: IdSequence,
    policy: DeletePolicy,
}

impl MemoryStore {
    /// Create an empty store with the default `Restrict` policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DeletePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> DeletePolicy {
        self.policy
    }

    fn owner_row(&self, id: EntityId) -> Result<&Owner> {
        self.owners.get(&id).ok_or_else(|| not_found(Owner::ENTITY, id))
    }

    fn hydrate_bike(&self, id: EntityId, row: &BikeRow) -> Result<Bike> {
        let owner = self.owner_row(row.owner_id).map_err(dangling)?.clone();
        Ok(Bike {
            id: Some(id),
            brand: row.brand.clone(),
            model: row.model.clone(),
            year: row.year,
            weight: row.weight,
            bike_type: row.bike_type,
            carbon: row.carbon,
            owner,
        })
    }

    fn hydrate_revision(&self, id: EntityId, row: &RevisionRow) -> Result<Revision> {
        let bike_row = self
            .bikes
            .get(&row.bike_id)
            .ok_or_else(|| dangling(not_found(Bike::ENTITY, row.bike_id)))?;
        let bike = self.hydrate_bike(row.bike_id, bike_row)?;
        Ok(Revision {
            id: Some(id),
            date: row.date,
            description: row.description.clone(),
            price: row.price,
            bike,
        })
    }

    /// Resolve the owner id a bike points at, checking the row exists
    fn parent_owner_id(&self, bike: &Bike) -> Result<EntityId> {
        let owner_id = bike
            .owner_id()
            .ok_or_else(|| missing_field(Bike::ENTITY, "owner_id"))?;
        if !self.owners.contains_key(&owner_id) {
            return Err(parent_not_found(Owner::ENTITY, owner_id));
        }
        Ok(owner_id)
    }

    fn parent_bike_id(&self, revision: &Revision) -> Result<EntityId> {
        let bike_id = revision
            .bike_id()
            .ok_or_else(|| missing_field(Revision::ENTITY, "bike_id"))?;
        if !self.bikes.contains_key(&bike_id) {
            return Err(parent_not_found(Bike::ENTITY, bike_id));
        }
        Ok(bike_id)
    }

    fn bike_row(&self, bike: &Bike, owner_id: EntityId) -> BikeRow {
        BikeRow {
            brand: bike.brand.clone(),
            model: bike.model.clone(),
            year: bike.year,
            weight: bike.weight,
            bike_type: bike.bike_type,
            carbon: bike.carbon,
            owner_id,
        }
    }

    fn revision_row(&self, revision: &Revision, bike_id: EntityId) -> RevisionRow {
        RevisionRow {
            date: revision.date,
            description: revision.description.clone(),
            price: revision.price,
            bike_id,
        }
    }
}

fn duplicate_key(entity: &'static str, id: EntityId) -> ExError {
    ExError::new(ExErrorKind::DuplicateKey)
        .with_op("save")
        .with_entity(entity)
        .with_entity_id(id)
        .with_message(format!("A {} with id {} already exists", entity, id))
}

fn ids_exhausted(entity: &'static str, id: EntityId) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("save")
        .with_entity(entity)
        .with_entity_id(id)
        .with_message(format!("No {} id can follow {}", entity, id))
}

fn parent_not_found(entity: &'static str, id: EntityId) -> ExError {
    ExError::new(ExErrorKind::ParentNotFound)
        .with_entity(entity)
        .with_entity_id(id)
        .with_message(format!("Referenced {} {} does not exist", entity, id))
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

/// A row points at a parent that no longer exists. Foreign-key checks make
/// this unreachable through the public API.
fn dangling(err: ExError) -> ExError {
    ExError::new(ExErrorKind::Internal).with_message(format!("Dangling reference: {}", err.message()))
}

impl Repository<Owner> for MemoryStore {
    fn get(&self, id: EntityId) -> Result<Owner> {
        self.owner_row(id).cloned().map_err(|e| e.with_op("get"))
    }

    fn get_all(&self) -> Result<Vec<Owner>> {
        Ok(self.owners.values().cloned().collect())
    }

    fn save(&mut self, owner: &mut Owner) -> Result<EntityId> {
        let id = match owner.id {
            Some(id) if self.owners.contains_key(&id) => {
                return Err(duplicate_key(Owner::ENTITY, id));
            }
            Some(id) => {
                self.owner_ids.observe(Owner::ENTITY, id)?;
                id
            }
            None => self.owner_ids.allocate(Owner::ENTITY)?,
        };
        owner.id = Some(id);
        self.owners.insert(id, owner.clone());
        Ok(id)
    }

    fn update(&mut self, owner: &Owner) -> Result<()> {
        let id = owner
            .id
            .ok_or_else(|| missing_field(Owner::ENTITY, "id").with_op("update"))?;
        let row = self
            .owners
            .get_mut(&id)
            .ok_or_else(|| not_found(Owner::ENTITY, id).with_op("update"))?;
        *row = owner.clone();
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<()> {
        if !self.owners.contains_key(&id) {
            return Err(not_found(Owner::ENTITY, id).with_op("delete"));
        }
        let bikes = self.bikes.values().filter(|b| b.owner_id == id).count();
        if bikes > 0 {
            return Err(referential_conflict(Owner::ENTITY, id, bikes, Bike::ENTITY));
        }
        self.owners.remove(&id);
        Ok(())
    }
}

impl Repository<Bike> for MemoryStore {
    fn get(&self, id: EntityId) -> Result<Bike> {
        let row = self
            .bikes
            .get(&id)
            .ok_or_else(|| not_found(Bike::ENTITY, id).with_op("get"))?;
        self.hydrate_bike(id, row)
    }

    fn get_all(&self) -> Result<Vec<Bike>> {
        self.bikes
            .iter()
            .map(|(id, row)| self.hydrate_bike(*id, row))
            .collect()
    }

    fn save(&mut self, bike: &mut Bike) -> Result<EntityId> {
        if let Some(id) = bike.id {
            if self.bikes.contains_key(&id) {
                return Err(duplicate_key(Bike::ENTITY, id));
            }
        }
        let owner_id = self.parent_owner_id(bike).map_err(|e| e.with_op("save"))?;
        let id = match bike.id {
            Some(id) => {
                self.bike_ids.observe(Bike::ENTITY, id)?;
                id
            }
            None => self.bike_ids.allocate(Bike::ENTITY)?,
        };
        let row = self.bike_row(bike, owner_id);
        self.bikes.insert(id, row);
        bike.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, bike: &Bike) -> Result<()> {
        let id = bike
            .id
            .ok_or_else(|| missing_field(Bike::ENTITY, "id").with_op("update"))?;
        if !self.bikes.contains_key(&id) {
            return Err(not_found(Bike::ENTITY, id).with_op("update"));
        }
        let owner_id = self.parent_owner_id(bike).map_err(|e| e.with_op("update"))?;
        let row = self.bike_row(bike, owner_id);
        self.bikes.insert(id, row);
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<()> {
        if !self.bikes.contains_key(&id) {
            return Err(not_found(Bike::ENTITY, id).with_op("delete"));
        }
        let revisions = self.revisions.values().filter(|r| r.bike_id == id).count();
        if revisions > 0 {
            if !self.policy.cascades_revisions() {
                return Err(referential_conflict(
                    Bike::ENTITY,
                    id,
                    revisions,
                    Revision::ENTITY,
                ));
            }
            self.revisions.retain(|_, r| r.bike_id != id);
        }
        self.bikes.remove(&id);
        Ok(())
    }
}

impl Repository<Revision> for MemoryStore {
    fn get(&self, id: EntityId) -> Result<Revision> {
        let row = self
            .revisions
            .get(&id)
            .ok_or_else(|| not_found(Revision::ENTITY, id).with_op("get"))?;
        self.hydrate_revision(id, row)
    }

    fn get_all(&self) -> Result<Vec<Revision>> {
        self.revisions
            .iter()
            .map(|(id, row)| self.hydrate_revision(*id, row))
            .collect()
    }

    fn save(&mut self, revision: &mut Revision) -> Result<EntityId> {
        if let Some(id) = revision.id {
            if self.revisions.contains_key(&id) {
                return Err(duplicate_key(Revision::ENTITY, id));
            }
        }
        let bike_id = self.parent_bike_id(revision).map_err(|e| e.with_op("save"))?;
        let id = match revision.id {
            Some(id) => {
                self.revision_ids.observe(Revision::ENTITY, id)?;
                id
            }
            None => self.revision_ids.allocate(Revision::ENTITY)?,
        };
        let row = self.revision_row(revision, bike_id);
        self.revisions.insert(id, row);
        revision.id = Some(id);
        Ok(id)
    }

    fn update(&mut self, revision: &Revision) -> Result<()> {
        let id = revision
            .id
            .ok_or_else(|| missing_field(Revision::ENTITY, "id").with_op("update"))?;
        if !self.revisions.contains_key(&id) {
            return Err(not_found(Revision::ENTITY, id).with_op("update"));
        }
        let bike_id = self.parent_bike_id(revision).map_err(|e| e.with_op("update"))?;
        let row = self.revision_row(revision, bike_id);
        self.revisions.insert(id, row);
        Ok(())
    }

    fn delete(&mut self, id: EntityId) -> Result<()> {
        self.revisions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(Revision::ENTITY, id).with_op("delete"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Owner {
        Owner::new("Joan", "Puig", "612345678", "joan@example.com")
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(Repository::<Owner>::get_all(&store).unwrap().is_empty());
        assert!(Repository::<Bike>::get_all(&store).unwrap().is_empty());
        assert!(Repository::<Revision>::get_all(&store).unwrap().is_empty());
        assert_eq!(store.policy(), DeletePolicy::Restrict);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut store = MemoryStore::new();
        let mut first = owner();
        let first_id = store.save(&mut first).unwrap();
        Repository::<Owner>::delete(&mut store, first_id).unwrap();

        let mut second = owner();
        let second_id = store.save(&mut second).unwrap();
        assert!(second_id > first_id);
    }

    #[test]
    fn test_explicit_id_advances_sequence() {
        let mut store = MemoryStore::new();
        let mut chosen = owner();
        chosen.id = Some(10);
        assert_eq!(store.save(&mut chosen).unwrap(), 10);

        let mut next = owner();
        assert_eq!(store.save(&mut next).unwrap(), 11);
    }

    #[test]
    fn test_bike_reads_follow_owner_updates() {
        let mut store = MemoryStore::new();
        let mut joan = owner();
        store.save(&mut joan).unwrap();
        let mut bike = Bike::new("Orbea", "Orca", 2020, 7.5, BikeType::Road, Carbon::Yes, joan.clone());
        let bike_id = store.save(&mut bike).unwrap();

        joan.surname = "Serra".to_string();
        store.update(&joan).unwrap();

        let read: Bike = store.get(bike_id).unwrap();
        assert_eq!(read.owner.surname, "Serra");
    }
}
