//! Session error types.

use serde::Serialize;
use thiserror::Error;

use testhive_core::{ProductId, ScreenId};

use crate::services::auth::AuthError;
use crate::services::cart::OutOfStock;
use crate::validation::ValidationError;

/// Errors an intent (or start-up) can produce.
///
/// Everything except `InvalidScreen` and `NotAvailable` is user-correctable
/// and is also recorded as the session's last error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A required field was blank.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No credential-list entry matched.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Add-to-cart on an unavailable product.
    #[error("{product} is currently out of stock")]
    OutOfStock { product: ProductId },

    /// A screen name that does not exist or cannot be started from.
    #[error("invalid screen: {0}")]
    InvalidScreen(String),

    /// The intent referenced a product id that is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The category is not one of the catalog's options.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The intent has no meaning on the current screen.
    #[error("{intent} is not available on the {screen} screen")]
    NotAvailable {
        intent: &'static str,
        screen: ScreenId,
    },
}

impl SessionError {
    /// Stable machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::InvalidCredentials => "invalid_credentials",
            Self::OutOfStock { .. } => "out_of_stock",
            Self::InvalidScreen(_) => "invalid_screen",
            Self::UnknownProduct(_) => "unknown_product",
            Self::UnknownCategory(_) => "unknown_category",
            Self::NotAvailable { .. } => "not_available",
        }
    }

    /// Whether the error is surfaced to the user on the originating screen.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        !matches!(self, Self::InvalidScreen(_) | Self::NotAvailable { .. })
    }
}

impl From<AuthError> for SessionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(err) => Self::Validation(err),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
        }
    }
}

impl From<OutOfStock> for SessionError {
    fn from(err: OutOfStock) -> Self {
        Self::OutOfStock {
            product: err.product,
        }
    }
}

/// The ephemeral "last error" shown on the screen that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub kind: &'static str,
    pub message: String,
    pub screen: ScreenId,
}

impl LastError {
    #[must_use]
    pub fn new(err: &SessionError, screen: ScreenId) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            screen,
        }
    }
}
