//! Authentication error types.

use thiserror::Error;

use testhive_core::EmailError;

use crate::validation::ValidationError;

/// Errors that can occur when checking a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required field was blank; the credential list was not consulted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid username or password")]
    InvalidCredentials,
}

/// Errors loading the static credential list.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The credential file could not be read.
    #[error("reading credential list: {0}")]
    Io(#[from] std::io::Error),

    /// The credential list is not valid JSON of the expected shape.
    #[error("malformed credential list: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry carries an invalid email address.
    #[error("invalid email for user {username}: {source}")]
    InvalidEmail {
        username: String,
        #[source]
        source: EmailError,
    },

    /// Two entries share a username.
    #[error("duplicate username in credential list: {0}")]
    DuplicateUsername(String),

    /// An entry has a blank username.
    #[error("credential list contains a blank username")]
    BlankUsername,
}
