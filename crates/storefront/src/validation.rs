//! Required-field validation.
//!
//! The only input rule the storefront enforces is non-emptiness after
//! trimming; there is no format checking of zips or card numbers.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// A user-entered field that must not be blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Password,
    Address,
    City,
    Zip,
    Card,
}

impl Field {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Address => "Address",
            Self::City => "City",
            Self::Zip => "ZIP code",
            Self::Card => "Card number",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A required field was empty or whitespace-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field} is required")]
pub struct ValidationError {
    pub field: Field,
}

/// Check that `value` has content after trimming.
///
/// Returns the trimmed value on success.
///
/// # Errors
///
/// Returns `ValidationError` naming `field` if `value` is blank.
pub fn require(value: &str, field: Field) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError { field });
    }
    Ok(trimmed)
}
