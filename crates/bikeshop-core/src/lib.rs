//! Bikeshop Core - entities, rules and orchestration
//!
//! This crate provides the behavioral core of the bike shop registry:
//! - Owner, Bike and Revision models
//! - Field validation rules with stable numeric codes
//! - The `Repository<T>` contract and an in-memory reference store
//! - Input forms and controllers for the insert / update / delete flows
//! - The structured error and logging facilities shared by every crate

pub mod controller;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod policy;
pub mod repo;
pub mod rules;

/// Re-exported for the logging macros
pub use bikeshop_core_types as core_types;

// Re-export commonly used types
pub use controller::{
    BikeController, BikeForm, OwnerController, OwnerForm, RevisionController, RevisionForm,
};
pub use errors::{ExError, ExErrorKind, Result, ValidationError};
pub use model::{Bike, BikeType, Carbon, EntityId, Owner, Revision};
pub use ops::MemoryStore;
pub use policy::DeletePolicy;
pub use repo::Repository;
