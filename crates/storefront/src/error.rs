//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Error bodies are JSON: `{"error": "<kind>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::models::User;
use crate::session::{SessionClosed, SessionError};

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The session rejected the intent.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The session task is gone.
    #[error("Session unavailable: {0}")]
    Unavailable(#[from] SessionClosed),

    /// The request body could not be read as an intent.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl AppError {
    /// Stable machine-readable kind, shared with the session's last error.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Session(err) => err.kind(),
            Self::Unavailable(_) => "session_unavailable",
            Self::BadRequest(_) => "bad_request",
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Session(err) => match err {
                SessionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                SessionError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                SessionError::OutOfStock { .. } | SessionError::NotAvailable { .. } => {
                    StatusCode::CONFLICT
                }
                SessionError::UnknownProduct(_) | SessionError::UnknownCategory(_) => {
                    StatusCode::NOT_FOUND
                }
                SessionError::InvalidScreen(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorBody {
            error: self.kind(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Keep the Sentry user context in step with the session's user.
///
/// Errors captured while someone is logged in are associated with them;
/// after logout the context is cleared.
pub fn sync_sentry_user(user: Option<&User>) {
    sentry::configure_scope(|scope| {
        scope.set_user(user.map(|user| sentry::User {
            username: Some(user.username.clone()),
            email: Some(user.email.as_str().to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testhive_core::{ProductId, ScreenId};

    use super::*;
    use crate::validation::{Field, ValidationError};

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(SessionError::from(ValidationError { field: Field::Zip }).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(SessionError::InvalidCredentials.into()),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(
                SessionError::OutOfStock {
                    product: ProductId::new("Playwright")
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(
                SessionError::NotAvailable {
                    intent: "checkout",
                    screen: ScreenId::Login
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(SessionError::UnknownProduct(ProductId::new("Karma")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unavailable(SessionClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(SessionError::from(ValidationError { field: Field::City }));
        assert_eq!(err.to_string(), "City is required");
        assert_eq!(err.kind(), "validation_error");
    }

    #[test]
    fn test_server_error_message_hidden() {
        let err = AppError::Session(SessionError::InvalidScreen("settings".to_string()));
        assert_eq!(err.kind(), "invalid_screen");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
