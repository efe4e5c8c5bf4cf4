use serde::{Deserialize, Serialize};

use super::EntityId;

/// Owner - a person who owns one or more bikes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    /// Store-assigned id; `None` until the owner is first saved
    pub id: Option<EntityId>,

    pub name: String,

    /// One or more surnames
    pub surname: String,

    /// Nine-digit phone number
    pub phone: String,

    pub email: String,
}

impl Owner {
    /// Entity label used in errors and logs
    pub const ENTITY: &'static str = "owner";

    /// Create a transient owner (no id yet)
    pub fn new(
        name: impl Into<String>,
        surname: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            surname: surname.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Full name as shown in list views: "Joan Puig"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}
