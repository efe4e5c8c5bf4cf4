use std::time::Instant;

use super::{finish, finish_load, BikeForm};
use crate::errors::{missing_field, ExError, ExErrorKind, Result};
use crate::log_op_start;
use crate::model::{Bike, EntityId, Owner};
use crate::repo::Repository;
use crate::rules::validation::validate_bike;

/// Bikes view
///
/// Owner ids from the form are resolved through `Repository<Owner>`; an id
/// with no row surfaces as `ParentNotFound`.
#[derive(Debug, Clone, Default)]
pub struct BikeController {
    bikes: Vec<Bike>,
}

/// Fetch the owner a bike form points at
fn resolve_owner<R: Repository<Owner>>(repo: &R, owner_id: EntityId) -> Result<Owner> {
    Repository::<Owner>::get(repo, owner_id).map_err(|err| {
        if err.kind() == ExErrorKind::NotFound {
            ExError::new(ExErrorKind::ParentNotFound)
                .with_entity(Owner::ENTITY)
                .with_entity_id(owner_id)
                .with_message(format!("Owner {} does not exist", owner_id))
        } else {
            err
        }
    })
}

/// Stand-in owner carrying only an id, used to validate a bike before any
/// store read
fn placeholder_owner(owner_id: EntityId) -> Owner {
    let mut owner = Owner::new("", "", "", "");
    owner.id = Some(owner_id);
    owner
}

impl BikeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the initial bike list
    ///
    /// # Errors
    /// Store failures from `get_all`.
    pub fn load<R: Repository<Bike>>(&mut self, repo: &R) -> Result<&[Bike]> {
        let started = Instant::now();
        log_op_start!("bike.load");
        let result = self.refresh(repo).map(|()| self.bikes.len());
        finish_load("bike.load", started, result)?;
        Ok(&self.bikes)
    }

    /// Re-read the bike list from the store
    ///
    /// # Errors
    /// Store failures from `get_all`.
    pub fn refresh<R: Repository<Bike>>(&mut self, repo: &R) -> Result<()> {
        self.bikes = Repository::<Bike>::get_all(repo)?;
        Ok(())
    }

    pub fn items(&self) -> &[Bike] {
        &self.bikes
    }

    pub fn find(&self, id: EntityId) -> Option<&Bike> {
        self.bikes.iter().find(|b| b.id == Some(id))
    }

    /// Bikes in the current list owned by `owner_id`
    pub fn by_owner(&self, owner_id: EntityId) -> impl Iterator<Item = &Bike> {
        self.bikes.iter().filter(move |b| b.owner_id() == Some(owner_id))
    }

    /// Validate and save a new bike for an existing owner
    ///
    /// # Errors
    /// Validation codes 21 to 24, `MissingField` or `InvalidChoice` for the
    /// type and carbon fields, `MissingField` without an owner id,
    /// `ParentNotFound` for an unknown owner, or the store's save errors.
    pub fn insert<R>(&mut self, repo: &mut R, form: &BikeForm) -> Result<Bike>
    where
        R: Repository<Bike> + Repository<Owner>,
    {
        let started = Instant::now();
        log_op_start!("bike.insert");
        let result = self.insert_inner(repo, form);
        finish("bike.insert", started, result)
    }

    fn insert_inner<R>(&mut self, repo: &mut R, form: &BikeForm) -> Result<Bike>
    where
        R: Repository<Bike> + Repository<Owner>,
    {
        let owner_id = form
            .owner_id
            .ok_or_else(|| missing_field(Bike::ENTITY, "owner_id"))?;
        let mut bike = form.build(placeholder_owner(owner_id))?;
        validate_bike(&bike)?;
        bike.owner = resolve_owner(&*repo, owner_id)?;
        Repository::<Bike>::save(repo, &mut bike)?;
        self.refresh(&*repo)?;
        Ok(bike)
    }

    /// Merge the supplied fields into bike `id`, validate, and store them
    ///
    /// A form owner id re-points the bike to that owner.
    ///
    /// # Errors
    /// `NotFound` for an unknown bike, `ParentNotFound` for an unknown new
    /// owner, validation codes 21 to 24, or the store's update errors.
    pub fn update<R>(&mut self, repo: &mut R, id: EntityId, form: &BikeForm) -> Result<Bike>
    where
        R: Repository<Bike> + Repository<Owner>,
    {
        let started = Instant::now();
        log_op_start!("bike.update", bike_id = id);
        let result = self.update_inner(repo, id, form);
        finish("bike.update", started, result)
    }

    fn update_inner<R>(&mut self, repo: &mut R, id: EntityId, form: &BikeForm) -> Result<Bike>
    where
        R: Repository<Bike> + Repository<Owner>,
    {
        let mut bike = Repository::<Bike>::get(&*repo, id)?;
        form.merge_into(&mut bike)?;
        validate_bike(&bike)?;
        if let Some(owner_id) = form.owner_id {
            if bike.owner_id() != Some(owner_id) {
                bike.owner = resolve_owner(&*repo, owner_id)?;
            }
        }
        Repository::<Bike>::update(repo, &bike)?;
        self.refresh(&*repo)?;
        Ok(bike)
    }

    /// Delete bike `id` and refresh the list
    ///
    /// Whether the bike's revisions block the delete or go with it is the
    /// store's delete policy.
    ///
    /// # Errors
    /// `NotFound`, or `ReferentialConflict` under the restrict policy while
    /// revisions reference the bike.
    pub fn delete<R: Repository<Bike>>(&mut self, repo: &mut R, id: EntityId) -> Result<()> {
        let started = Instant::now();
        log_op_start!("bike.delete", bike_id = id);
        let result = Repository::<Bike>::delete(repo, id).and_then(|()| self.refresh(&*repo));
        finish("bike.delete", started, result)
    }
}
