use std::sync::OnceLock;

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

use crate::errors::ValidationError;
use crate::model::{Bike, Owner, Revision};

/// Earliest accepted manufacture year
pub const MIN_YEAR: i32 = 1990;

/// One or more words separated by ASCII whitespace, each an uppercase
/// letter followed by lowercase letters only. Latin-1 accented letters, Ñ
/// and Ç included.
const TITLE_CASE_PATTERN: &str =
    r"^[A-ZÀ-ÖØ-Ý][a-zß-öø-ÿ]*((?-u:\s)+[A-ZÀ-ÖØ-Ý][a-zß-öø-ÿ]*)*$";
const PHONE_PATTERN: &str = r"^[0-9]{9}$";
const EMAIL_PATTERN: &str = r"^[^@ \t\n\x0B\x0C\r]+@[^ \t\n\x0B\x0C\r]+$";
/// Zero-padded `YYYY-MM-DD`
const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";

fn title_case_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TITLE_CASE_PATTERN).expect("title-case pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"))
}

/// Current calendar year in local time
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Check that `value` is one or more capitalized words
///
/// Blank input never matches.
pub fn validate_title_case(value: &str) -> bool {
    title_case_regex().is_match(value)
}

/// Check that `value` is exactly nine digits
pub fn validate_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

/// Check for a non-empty local part, an `@`, and something after it
pub fn validate_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Check that `year` lies in `MIN_YEAR..=current_year`
pub fn validate_year(year: i32, current_year: i32) -> bool {
    (MIN_YEAR..=current_year).contains(&year)
}

/// Check for a finite, strictly positive amount (weight, price)
pub fn validate_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Parse an ISO `YYYY-MM-DD` revision date
///
/// # Errors
/// `ValidationError::RevisionDate` (code 31) when the text is not a real
/// calendar date in that format.
pub fn parse_revision_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::RevisionDate {
        value: value.to_string(),
    };
    // chrono accepts unpadded fields such as 2024-3-5
    if !date_regex().is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}

/// Validate an owner candidate
///
/// Fields are checked in order (name, surname, phone, email); the first
/// failure is returned.
///
/// # Errors
/// Codes 11 to 14.
pub fn validate_owner(owner: &Owner) -> Result<(), ValidationError> {
    if !validate_title_case(&owner.name) {
        return Err(ValidationError::OwnerName {
            value: owner.name.clone(),
        });
    }
    if !validate_title_case(&owner.surname) {
        return Err(ValidationError::OwnerSurname {
            value: owner.surname.clone(),
        });
    }
    if !validate_phone(&owner.phone) {
        return Err(ValidationError::Phone {
            value: owner.phone.clone(),
        });
    }
    if !validate_email(&owner.email) {
        return Err(ValidationError::Email {
            value: owner.email.clone(),
        });
    }
    Ok(())
}

/// Validate a bike candidate against the current calendar year
///
/// # Errors
/// Codes 21 to 24.
pub fn validate_bike(bike: &Bike) -> Result<(), ValidationError> {
    validate_bike_at(bike, current_year())
}

/// Validate a bike candidate against an explicit `current_year`
///
/// The owner reference is not re-validated here; it is checked by the store
/// when the bike is saved.
///
/// # Errors
/// Codes 21 to 24.
pub fn validate_bike_at(bike: &Bike, current_year: i32) -> Result<(), ValidationError> {
    if !validate_title_case(&bike.brand) {
        return Err(ValidationError::BikeBrand {
            value: bike.brand.clone(),
        });
    }
    if !validate_title_case(&bike.model) {
        return Err(ValidationError::BikeModel {
            value: bike.model.clone(),
        });
    }
    if !validate_year(bike.year, current_year) {
        return Err(ValidationError::Year {
            value: bike.year.to_string(),
            min: MIN_YEAR,
            max: current_year,
        });
    }
    if !validate_positive(bike.weight) {
        return Err(ValidationError::Weight {
            value: bike.weight.to_string(),
        });
    }
    Ok(())
}

/// Validate a revision candidate
///
/// The date is already typed here; textual dates go through
/// [`parse_revision_date`] first.
///
/// # Errors
/// Codes 32 and 33.
pub fn validate_revision(revision: &Revision) -> Result<(), ValidationError> {
    if !validate_title_case(&revision.description) {
        return Err(ValidationError::RevisionDescription {
            value: revision.description.clone(),
        });
    }
    if !validate_positive(revision.price) {
        return Err(ValidationError::RevisionPrice {
            value: revision.price.to_string(),
        });
    }
    Ok(())
}
