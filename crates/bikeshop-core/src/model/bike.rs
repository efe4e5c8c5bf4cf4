use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EntityId, Owner};
use crate::errors::{ExError, ExErrorKind};

/// Kind of bicycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BikeType {
    /// Mountain bike
    Mtb,
    Road,
    Gravel,
    /// Electric-assist bike
    Ebike,
}

impl BikeType {
    pub const ALL: [BikeType; 4] = [
        BikeType::Mtb,
        BikeType::Road,
        BikeType::Gravel,
        BikeType::Ebike,
    ];

    /// Token stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeType::Mtb => "MTB",
            BikeType::Road => "ROAD",
            BikeType::Gravel => "GRAVEL",
            BikeType::Ebike => "EBIKE",
        }
    }
}

impl fmt::Display for BikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BikeType {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mtb" | "mountain" => Ok(BikeType::Mtb),
            "road" => Ok(BikeType::Road),
            "gravel" => Ok(BikeType::Gravel),
            "ebike" | "e-bike" => Ok(BikeType::Ebike),
            _ => Err(ExError::new(ExErrorKind::InvalidChoice)
                .with_entity(Bike::ENTITY)
                .with_message(format!(
                    "Unknown bike type '{}': expected one of MTB, ROAD, GRAVEL, EBIKE",
                    s
                ))),
        }
    }
}

/// Whether the frame is carbon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Carbon {
    Yes,
    No,
}

impl Carbon {
    /// Token stored in the `carbon` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Carbon::Yes => "YES",
            Carbon::No => "NO",
        }
    }
}

impl From<bool> for Carbon {
    fn from(value: bool) -> Self {
        if value {
            Carbon::Yes
        } else {
            Carbon::No
        }
    }
}

impl fmt::Display for Carbon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Carbon {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "si" | "true" => Ok(Carbon::Yes),
            "no" | "false" => Ok(Carbon::No),
            _ => Err(ExError::new(ExErrorKind::InvalidChoice)
                .with_entity(Bike::ENTITY)
                .with_message(format!(
                    "Unknown carbon flag '{}': expected YES or NO",
                    s
                ))),
        }
    }
}

/// Bike - a bicycle with physical attributes and exactly one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    /// Store-assigned id; `None` until the bike is first saved
    pub id: Option<EntityId>,

    pub brand: String,

    pub model: String,

    /// Manufacture year
    pub year: i32,

    /// Weight in kilograms
    pub weight: f64,

    pub bike_type: BikeType,

    pub carbon: Carbon,

    /// Owning owner, hydrated on every read
    pub owner: Owner,
}

impl Bike {
    pub const ENTITY: &'static str = "bike";

    /// Create a transient bike (no id yet)
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        year: i32,
        weight: f64,
        bike_type: BikeType,
        carbon: Carbon,
        owner: Owner,
    ) -> Self {
        Self {
            id: None,
            brand: brand.into(),
            model: model.into(),
            year,
            weight,
            bike_type,
            carbon,
            owner,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Id of the owning owner, if that owner has been saved
    pub fn owner_id(&self) -> Option<EntityId> {
        self.owner.id
    }

    /// Name shown in list views: "Orbea Orca"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}
