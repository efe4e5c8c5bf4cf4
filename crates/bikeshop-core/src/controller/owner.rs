use std::time::Instant;

use super::{finish, finish_load, OwnerForm};
use crate::core_types::Sensitive;
use crate::errors::Result;
use crate::log_op_start;
use crate::model::{EntityId, Owner};
use crate::repo::Repository;
use crate::rules::validation::validate_owner;

/// Owners view: the current owner list plus the flows that change it
#[derive(Debug, Clone, Default)]
pub struct OwnerController {
    owners: Vec<Owner>,
}

impl OwnerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the initial owner list
    ///
    /// # Errors
    /// Store failures from `get_all`.
    pub fn load<R: Repository<Owner>>(&mut self, repo: &R) -> Result<&[Owner]> {
        let started = Instant::now();
        log_op_start!("owner.load");
        let result = self.refresh(repo).map(|()| self.owners.len());
        finish_load("owner.load", started, result)?;
        Ok(&self.owners)
    }

    /// Re-read the owner list from the store
    ///
    /// # Errors
    /// Store failures from `get_all`.
    pub fn refresh<R: Repository<Owner>>(&mut self, repo: &R) -> Result<()> {
        self.owners = Repository::<Owner>::get_all(repo)?;
        Ok(())
    }

    pub fn items(&self) -> &[Owner] {
        &self.owners
    }

    /// Look an owner up in the current list
    pub fn find(&self, id: EntityId) -> Option<&Owner> {
        self.owners.iter().find(|o| o.id == Some(id))
    }

    /// Validate and save a new owner, then refresh the list
    ///
    /// # Errors
    /// Validation codes 11 to 14 (nothing is saved), or the store's save
    /// errors.
    pub fn insert<R: Repository<Owner>>(&mut self, repo: &mut R, form: &OwnerForm) -> Result<Owner> {
        let started = Instant::now();
        log_op_start!(
            "owner.insert",
            phone = %Sensitive::new(form.phone.as_deref().unwrap_or_default()),
            email = %Sensitive::new(form.email.as_deref().unwrap_or_default()),
        );
        let result = self.insert_inner(repo, form);
        finish("owner.insert", started, result)
    }

    fn insert_inner<R: Repository<Owner>>(&mut self, repo: &mut R, form: &OwnerForm) -> Result<Owner> {
        let mut owner = form.build();
        validate_owner(&owner)?;
        Repository::<Owner>::save(repo, &mut owner)?;
        self.refresh(&*repo)?;
        Ok(owner)
    }

    /// Merge the supplied fields into owner `id`, validate, and store them
    ///
    /// # Errors
    /// `NotFound` for an unknown id, validation codes 11 to 14, or the
    /// store's update errors.
    pub fn update<R: Repository<Owner>>(
        &mut self,
        repo: &mut R,
        id: EntityId,
        form: &OwnerForm,
    ) -> Result<Owner> {
        let started = Instant::now();
        log_op_start!("owner.update", owner_id = id);
        let result = self.update_inner(repo, id, form);
        finish("owner.update", started, result)
    }

    fn update_inner<R: Repository<Owner>>(
        &mut self,
        repo: &mut R,
        id: EntityId,
        form: &OwnerForm,
    ) -> Result<Owner> {
        let mut owner = Repository::<Owner>::get(repo, id)?;
        form.merge_into(&mut owner);
        validate_owner(&owner)?;
        Repository::<Owner>::update(repo, &owner)?;
        self.refresh(&*repo)?;
        Ok(owner)
    }

    /// Delete owner `id` and refresh the list
    ///
    /// An owner with bikes is never deleted, whatever the store policy.
    ///
    /// # Errors
    /// `NotFound`, or `ReferentialConflict` while bikes reference the owner.
    pub fn delete<R: Repository<Owner>>(&mut self, repo: &mut R, id: EntityId) -> Result<()> {
        let started = Instant::now();
        log_op_start!("owner.delete", owner_id = id);
        let result = Repository::<Owner>::delete(repo, id).and_then(|()| self.refresh(&*repo));
        finish("owner.delete", started, result)
    }
}

impl From<&Owner> for OwnerForm {
    fn from(owner: &Owner) -> Self {
        Self {
            name: Some(owner.name.clone()),
            surname: Some(owner.surname.clone()),
            phone: Some(owner.phone.clone()),
            email: Some(owner.email.clone()),
        }
    }
}
