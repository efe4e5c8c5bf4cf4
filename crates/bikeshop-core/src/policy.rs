//! Delete policy for parent rows that still have children
//!
//! The policy is chosen once, when a store is constructed. Callers never
//! decide it per delete.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind};

/// What a store does when asked to delete a referenced row
///
/// | Target | `Restrict` | `Cascade` |
/// |---|---|---|
/// | owner with bikes | `ReferentialConflict` | `ReferentialConflict` |
/// | bike with revisions | `ReferentialConflict` | bike and its revisions removed |
///
/// Owners are never cascaded.
///
/// # Example
/// ```
/// use bikeshop_core::policy::DeletePolicy;
///
/// assert_eq!(DeletePolicy::default(), DeletePolicy::Restrict);
/// assert_eq!("cascade".parse::<DeletePolicy>().unwrap(), DeletePolicy::Cascade);
/// assert!(DeletePolicy::Cascade.cascades_revisions());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Refuse the delete while children exist
    #[default]
    Restrict,
    /// Remove a bike's revisions together with the bike
    Cascade,
}

impl DeletePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletePolicy::Restrict => "restrict",
            DeletePolicy::Cascade => "cascade",
        }
    }

    /// True when deleting a bike also deletes its revisions
    pub fn cascades_revisions(&self) -> bool {
        matches!(self, DeletePolicy::Cascade)
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = ExError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restrict" => Ok(DeletePolicy::Restrict),
            "cascade" => Ok(DeletePolicy::Cascade),
            other => Err(ExError::new(ExErrorKind::Config).with_message(format!(
                "Unknown delete policy '{}': expected restrict or cascade",
                other
            ))),
        }
    }
}
