use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Bike, EntityId};

/// Revision - a maintenance record for one bike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Store-assigned id; `None` until the revision is first saved
    pub id: Option<EntityId>,

    pub date: NaiveDate,

    pub description: String,

    pub price: f64,

    /// Revised bike, hydrated with its owner on every read
    pub bike: Bike,
}

impl Revision {
    pub const ENTITY: &'static str = "revision";

    /// Create a transient revision (no id yet)
    pub fn new(date: NaiveDate, description: impl Into<String>, price: f64, bike: Bike) -> Self {
        Self {
            id: None,
            date,
            description: description.into(),
            price,
            bike,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn bike_id(&self) -> Option<EntityId> {
        self.bike.id
    }

    /// Revisions are listed under the name of the bike they belong to
    pub fn display_name(&self) -> String {
        self.bike.display_name()
    }
}
