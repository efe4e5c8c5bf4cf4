//! Redaction wrapper for personal data
//!
//! Owner phone numbers and email addresses must never reach log output in
//! clear text. Wrap them in `Sensitive` before handing them to `tracing`.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// Wrapper that redacts its value in `Debug` and `Display`
///
/// # Example
///
/// ```
/// use bikeshop_core_types::Sensitive;
///
/// let phone = Sensitive::new("612345678");
/// assert_eq!(format!("{}", phone), "***REDACTED***");
/// assert_eq!(phone.expose(), &"612345678");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the clear value. Callers own the decision to reveal it.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
