//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Session
//! GET  /state                  - Current session snapshot
//! POST /intents                - Apply one intent, returns the new snapshot
//! ```

pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
pub async fn health() -> &'static str {
    "ok"
}

/// Create the session routes router.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(session::show))
        .route("/intents", post(session::dispatch))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(session_routes())
}
