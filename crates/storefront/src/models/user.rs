//! User domain types.
//!
//! A [`Credential`] is one entry of the static credential list; a [`User`]
//! is the public part of it that the session keeps once authenticated.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use testhive_core::Email;

/// An authenticated storefront user.
///
/// Identity is `username`; users are never created or mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Login name, compared exactly (case-sensitive).
    pub username: String,
    /// Contact address shown on the account header.
    pub email: Email,
}

/// An entry in the static credential list.
///
/// The password is compared in plain form; it is only wrapped in a
/// [`SecretString`] so it never ends up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct Credential {
    user: User,
    password: SecretString,
}

impl Credential {
    /// Create a credential-list entry.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>, email: Email) -> Self {
        Self {
            user: User {
                username: username.into(),
                email,
            },
            password: SecretString::from(password.into()),
        }
    }

    /// The user this entry authenticates.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Exact, case-sensitive match on both fields.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.user.username == username && self.password.expose_secret() == password
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn devicelab() -> Credential {
        Credential::new(
            "devicelab",
            "robustest",
            Email::parse("devicelab@robustest.com").unwrap(),
        )
    }

    #[test]
    fn test_matches_exactly() {
        let credential = devicelab();
        assert!(credential.matches("devicelab", "robustest"));
        assert!(!credential.matches("DeviceLab", "robustest"));
        assert!(!credential.matches("devicelab", "Robustest"));
        assert!(!credential.matches("devicelab", " robustest"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug_output = format!("{:?}", devicelab());
        assert!(debug_output.contains("devicelab"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("password: \"robustest\""));
    }
}
