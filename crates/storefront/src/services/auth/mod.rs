//! Authentication service.
//!
//! Validates a username/password pair against the static credential list.
//! There is no hashing, lockout, or retry policy; each attempt is checked
//! once and the result reported.

mod error;

pub use error::{AuthError, CredentialError};

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::instrument;

use testhive_core::Email;

use crate::models::{Credential, User};
use crate::validation::{Field, require};

/// Credential list bundled with the binary.
const BUNDLED_USERS: &str = include_str!("../../../data/users.json");

/// Shape of one entry in the credential list JSON.
#[derive(Deserialize)]
struct CredentialRecord {
    username: String,
    password: String,
    email: String,
}

/// The ordered, read-only list of valid users.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    entries: Vec<Credential>,
}

impl CredentialStore {
    /// Build a store from already-constructed entries.
    #[must_use]
    pub const fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// The credential list shipped in `data/users.json`.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the bundled data is malformed.
    pub fn bundled() -> Result<Self, CredentialError> {
        Self::from_json(BUNDLED_USERS)
    }

    /// Load a credential list from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CredentialError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a credential list from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError` on malformed JSON, invalid emails, blank or
    /// duplicate usernames.
    pub fn from_json(raw: &str) -> Result<Self, CredentialError> {
        let records: Vec<CredentialRecord> = serde_json::from_str(raw)?;
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(records.len());

        for record in records {
            if record.username.trim().is_empty() {
                return Err(CredentialError::BlankUsername);
            }
            if !seen.insert(record.username.clone()) {
                return Err(CredentialError::DuplicateUsername(record.username));
            }
            let email = Email::parse(&record.email).map_err(|source| {
                CredentialError::InvalidEmail {
                    username: record.username.clone(),
                    source,
                }
            })?;
            entries.push(Credential::new(record.username, record.password, email));
        }

        Ok(Self { entries })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty (nobody can log in).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry matching both fields exactly.
    fn find(&self, username: &str, password: &str) -> Option<&Credential> {
        self.entries
            .iter()
            .find(|entry| entry.matches(username, password))
    }
}

/// Check a login attempt.
///
/// Both inputs must be non-empty after trimming, checked username first;
/// a blank field fails without consulting the list. The username is then
/// trimmed before matching while the password is compared raw.
///
/// # Errors
///
/// Returns `AuthError::Validation` naming the blank field, or
/// `AuthError::InvalidCredentials` when no entry matches.
#[instrument(skip(store, password))]
pub fn authenticate(
    store: &CredentialStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let username = require(username, Field::Username)?;
    require(password, Field::Password)?;

    match store.find(username, password) {
        Some(entry) => {
            tracing::info!(username, "Login accepted");
            Ok(entry.user().clone())
        }
        None => {
            tracing::debug!(username, "Login rejected");
            Err(AuthError::InvalidCredentials)
        }
    }
}
