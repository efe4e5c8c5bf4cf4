//! Raw user input for the three entity forms
//!
//! Text fields arrive exactly as typed. Every field is optional so the same
//! form serves both insert (absent means empty) and update (absent means
//! keep the stored value). Parent references are plain ids.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{missing_field, Result, ValidationError};
use crate::model::{Bike, BikeType, Carbon, EntityId, Owner, Revision};
use crate::rules::validation::parse_revision_date;

/// Trimmed view of an optional field; blank counts as absent
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Trimmed value for insert, where an absent field is the empty string
fn text_or_empty(value: &Option<String>) -> String {
    text(value).unwrap_or_default().to_string()
}

fn parse_year(value: &str) -> std::result::Result<i32, ValidationError> {
    value.parse().map_err(|_| ValidationError::Year {
        value: value.to_string(),
        min: crate::rules::validation::MIN_YEAR,
        max: crate::rules::validation::current_year(),
    })
}

fn parse_weight(value: &str) -> std::result::Result<f64, ValidationError> {
    value.parse().map_err(|_| ValidationError::Weight {
        value: value.to_string(),
    })
}

fn parse_price(value: &str) -> std::result::Result<f64, ValidationError> {
    value.parse().map_err(|_| ValidationError::RevisionPrice {
        value: value.to_string(),
    })
}

/// Owner form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerForm {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl OwnerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn surname(mut self, value: impl Into<String>) -> Self {
        self.surname = Some(value.into());
        self
    }

    pub fn phone(mut self, value: impl Into<String>) -> Self {
        self.phone = Some(value.into());
        self
    }

    pub fn email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    /// Build a transient owner; absent fields become empty strings
    pub fn build(&self) -> Owner {
        Owner::new(
            text_or_empty(&self.name),
            text_or_empty(&self.surname),
            text_or_empty(&self.phone),
            text_or_empty(&self.email),
        )
    }

    /// Overwrite the supplied fields of a stored owner
    pub fn merge_into(&self, owner: &mut Owner) {
        if let Some(v) = text(&self.name) {
            owner.name = v.to_string();
        }
        if let Some(v) = text(&self.surname) {
            owner.surname = v.to_string();
        }
        if let Some(v) = text(&self.phone) {
            owner.phone = v.to_string();
        }
        if let Some(v) = text(&self.email) {
            owner.email = v.to_string();
        }
    }
}

/// Bike form input
///
/// `year` and `weight` are raw text; text that does not parse fails with
/// the field's validation code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BikeForm {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub weight: Option<String>,
    pub bike_type: Option<String>,
    pub carbon: Option<String>,
    pub owner_id: Option<EntityId>,
}

impl BikeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brand(mut self, value: impl Into<String>) -> Self {
        self.brand = Some(value.into());
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.model = Some(value.into());
        self
    }

    pub fn year(mut self, value: impl Into<String>) -> Self {
        self.year = Some(value.into());
        self
    }

    pub fn weight(mut self, value: impl Into<String>) -> Self {
        self.weight = Some(value.into());
        self
    }

    pub fn bike_type(mut self, value: impl Into<String>) -> Self {
        self.bike_type = Some(value.into());
        self
    }

    pub fn carbon(mut self, value: impl Into<String>) -> Self {
        self.carbon = Some(value.into());
        self
    }

    pub fn owner_id(mut self, id: EntityId) -> Self {
        self.owner_id = Some(id);
        self
    }

    /// Build a transient bike around `owner`
    ///
    /// # Errors
    /// Code 23 or 24 for unparsable numbers, `MissingField` for an absent
    /// type or carbon flag, `InvalidChoice` for an unknown one.
    pub fn build(&self, owner: Owner) -> Result<Bike> {
        let year = parse_year(&text_or_empty(&self.year))?;
        let weight = parse_weight(&text_or_empty(&self.weight))?;
        let bike_type: BikeType = text(&self.bike_type)
            .ok_or_else(|| missing_field(Bike::ENTITY, "type"))?
            .parse()?;
        let carbon: Carbon = text(&self.carbon)
            .ok_or_else(|| missing_field(Bike::ENTITY, "carbon"))?
            .parse()?;
        Ok(Bike::new(
            text_or_empty(&self.brand),
            text_or_empty(&self.model),
            year,
            weight,
            bike_type,
            carbon,
            owner,
        ))
    }

    /// Overwrite the supplied fields of a stored bike
    ///
    /// The owner reference is resolved by the controller, not here.
    ///
    /// # Errors
    /// As [`BikeForm::build`], for the fields that are present.
    pub fn merge_into(&self, bike: &mut Bike) -> Result<()> {
        if let Some(v) = text(&self.brand) {
            bike.brand = v.to_string();
        }
        if let Some(v) = text(&self.model) {
            bike.model = v.to_string();
        }
        if let Some(v) = text(&self.year) {
            bike.year = parse_year(v)?;
        }
        if let Some(v) = text(&self.weight) {
            bike.weight = parse_weight(v)?;
        }
        if let Some(v) = text(&self.bike_type) {
            bike.bike_type = v.parse()?;
        }
        if let Some(v) = text(&self.carbon) {
            bike.carbon = v.parse()?;
        }
        Ok(())
    }
}

/// Revision form input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionForm {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub bike_id: Option<EntityId>,
}

impl RevisionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, value: impl Into<String>) -> Self {
        self.date = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn price(mut self, value: impl Into<String>) -> Self {
        self.price = Some(value.into());
        self
    }

    pub fn bike_id(mut self, id: EntityId) -> Self {
        self.bike_id = Some(id);
        self
    }

    fn parse_date(&self) -> Result<NaiveDate> {
        Ok(parse_revision_date(&text_or_empty(&self.date))?)
    }

    /// Build a transient revision for `bike`
    ///
    /// # Errors
    /// Code 31 for a bad date, 33 for an unparsable price.
    pub fn build(&self, bike: Bike) -> Result<Revision> {
        let date = self.parse_date()?;
        let price = parse_price(&text_or_empty(&self.price))?;
        Ok(Revision::new(date, text_or_empty(&self.description), price, bike))
    }

    /// Overwrite the supplied fields of a stored revision
    ///
    /// # Errors
    /// As [`RevisionForm::build`], for the fields that are present.
    pub fn merge_into(&self, revision: &mut Revision) -> Result<()> {
        if text(&self.date).is_some() {
            revision.date = self.parse_date()?;
        }
        if let Some(v) = text(&self.description) {
            revision.description = v.to_string();
        }
        if let Some(v) = text(&self.price) {
            revision.price = parse_price(v)?;
        }
        Ok(())
    }
}
