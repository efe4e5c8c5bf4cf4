//! Repository contract shared by every store backend
//!
//! One trait, parameterized by entity, implemented once per entity by each
//! backend. A backend that stores all three entities implements
//! `Repository<Owner>`, `Repository<Bike>` and `Repository<Revision>`.
//!
//! Where the entity cannot be inferred from arguments or the expected
//! result (notably `delete`), call through the trait:
//!
//! ```
//! use bikeshop_core::{MemoryStore, Owner, Repository};
//!
//! let mut store = MemoryStore::new();
//! let mut owner = Owner::new("Joan", "Puig", "612345678", "joan@example.com");
//! let id = store.save(&mut owner).unwrap();
//!
//! Repository::<Owner>::delete(&mut store, id).unwrap();
//! assert!(Repository::<Owner>::get(&store, id).is_err());
//! ```

use crate::errors::Result;
use crate::model::EntityId;

/// CRUD contract for one entity type
///
/// Reads return fully hydrated entities: a bike carries its owner, a
/// revision carries its bike and that bike's owner.
pub trait Repository<T> {
    /// Fetch one entity by id
    ///
    /// # Errors
    /// `NotFound` when no row has this id.
    fn get(&self, id: EntityId) -> Result<T>;

    /// Fetch every entity, ordered by id
    ///
    /// # Errors
    /// Store failures only; an empty table yields an empty vector.
    fn get_all(&self) -> Result<Vec<T>>;

    /// Insert a new entity and write the assigned id back into it
    ///
    /// An entity that already carries an id is inserted under that id.
    ///
    /// # Errors
    /// `DuplicateKey` when the id is taken, `MissingField` when the parent
    /// reference has no id, `ParentNotFound` when it has no row.
    fn save(&mut self, entity: &mut T) -> Result<EntityId>;

    /// Overwrite the stored row with the entity's current field values
    ///
    /// # Errors
    /// `MissingField` when the entity has no id, `NotFound` when no row
    /// has it, and the parent errors of [`Repository::save`].
    fn update(&mut self, entity: &T) -> Result<()>;

    /// Remove one entity
    ///
    /// # Errors
    /// `NotFound` when no row has this id, `ReferentialConflict` when
    /// child rows still point at it and the store's delete policy does not
    /// remove them.
    fn delete(&mut self, id: EntityId) -> Result<()>;
}
