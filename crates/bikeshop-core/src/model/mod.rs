pub mod bike;
pub mod owner;
pub mod revision;

pub use bike::{Bike, BikeType, Carbon};
pub use owner::Owner;
pub use revision::Revision;

/// Identifier assigned by the store on first save
pub type EntityId = i64;
