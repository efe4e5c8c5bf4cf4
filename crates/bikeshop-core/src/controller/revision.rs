use std::time::Instant;

use super::{finish, finish_load, RevisionForm};
use crate::errors::{missing_field, ExError, ExErrorKind, Result};
use crate::log_op_start;
use crate::model::{Bike, BikeType, Carbon, EntityId, Owner, Revision};
use crate::repo::Repository;
use crate::rules::validation::validate_revision;

/// Revisions view
#[derive(Debug, Clone, Default)]
pub struct RevisionController {
    revisions: Vec<Revision>,
}

fn resolve_bike<R: Repository<Bike>>(repo: &R, bike_id: EntityId) -> Result<Bike> {
    Repository::<Bike>::get(repo, bike_id).map_err(|err| {
        if err.kind() == ExErrorKind::NotFound {
            ExError::new(ExErrorKind::ParentNotFound)
                .with_entity(Bike::ENTITY)
                .with_entity_id(bike_id)
                .with_message(format!("Bike {} does not exist", bike_id))
        } else {
            err
        }
    })
}

/// Stand-in bike carrying only an id, used to validate a revision before any
/// store read
fn placeholder_bike(bike_id: EntityId) -> Bike {
    let owner = Owner::new("", "", "", "");
    let mut bike = Bike::new("", "", 0, 0.0, BikeType::Mtb, Carbon::No, owner);
    bike.id = Some(bike_id);
    bike
}

impl RevisionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the initial revision list
    ///
    /// # Errors
    /// Store failures from `get_all`.
    pub fn load<R: Repository<Revision>>(&mut self, repo: &R) -> Result<&[Revision]> {
        let started = Instant::now();
        log_op_start!("revision.load");
        let result = self.refresh(repo).map(|()| self.revisions.len());
        finish_load("revision.load", started, result)?;
        Ok(&self.revisions)
    }

    /// # Errors
    /// Store failures from `get_all`.
    pub fn refresh<R: Repository<Revision>>(&mut self, repo: &R) -> Result<()> {
        self.revisions = Repository::<Revision>::get_all(repo)?;
        Ok(())
    }

    pub fn items(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn find(&self, id: EntityId) -> Option<&Revision> {
        self.revisions.iter().find(|r| r.id == Some(id))
    }

    /// Validate and save a new revision for an existing bike
    ///
    /// Fields are validated before the bike is looked up, so bad input is
    /// reported even when the bike id is also wrong.
    ///
    /// # Errors
    /// Codes 31 to 33, `MissingField` without a bike id, `ParentNotFound`
    /// for an unknown bike, or the store's save errors.
    pub fn insert<R>(&mut self, repo: &mut R, form: &RevisionForm) -> Result<Revision>
    where
        R: Repository<Revision> + Repository<Bike>,
    {
        let started = Instant::now();
        log_op_start!("revision.insert");
        let result = self.insert_inner(repo, form);
        finish("revision.insert", started, result)
    }

    fn insert_inner<R>(&mut self, repo: &mut R, form: &RevisionForm) -> Result<Revision>
    where
        R: Repository<Revision> + Repository<Bike>,
    {
        let bike_id = form
            .bike_id
            .ok_or_else(|| missing_field(Revision::ENTITY, "bike_id"))?;
        let mut revision = form.build(placeholder_bike(bike_id))?;
        validate_revision(&revision)?;
        revision.bike = resolve_bike(&*repo, bike_id)?;
        Repository::<Revision>::save(repo, &mut revision)?;
        self.refresh(&*repo)?;
        Ok(revision)
    }

    /// Merge the supplied fields into revision `id`, validate, and store them
    ///
    /// # Errors
    /// `NotFound` for an unknown revision, `ParentNotFound` for an unknown
    /// new bike, codes 31 to 33, or the store's update errors.
    pub fn update<R>(&mut self, repo: &mut R, id: EntityId, form: &RevisionForm) -> Result<Revision>
    where
        R: Repository<Revision> + Repository<Bike>,
    {
        let started = Instant::now();
        log_op_start!("revision.update", revision_id = id);
        let result = self.update_inner(repo, id, form);
        finish("revision.update", started, result)
    }

    fn update_inner<R>(&mut self, repo: &mut R, id: EntityId, form: &RevisionForm) -> Result<Revision>
    where
        R: Repository<Revision> + Repository<Bike>,
    {
        let mut revision = Repository::<Revision>::get(&*repo, id)?;
        form.merge_into(&mut revision)?;
        validate_revision(&revision)?;
        if let Some(bike_id) = form.bike_id {
            if revision.bike_id() != Some(bike_id) {
                revision.bike = resolve_bike(&*repo, bike_id)?;
            }
        }
        Repository::<Revision>::update(repo, &revision)?;
        self.refresh(&*repo)?;
        Ok(revision)
    }

    /// # Errors
    /// `NotFound` for an unknown revision.
    pub fn delete<R: Repository<Revision>>(&mut self, repo: &mut R, id: EntityId) -> Result<()> {
        let started = Instant::now();
        log_op_start!("revision.delete", revision_id = id);
        let result = Repository::<Revision>::delete(repo, id).and_then(|()| self.refresh(&*repo));
        finish("revision.delete", started, result)
    }
}
