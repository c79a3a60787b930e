//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::StorefrontConfig;
use crate::services::auth::{CredentialError, CredentialStore};
use crate::services::catalog::{Catalog, CatalogError};
use crate::session::{SessionHandle, spawn_session};

/// Error loading the static data the session needs.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("credentials: {0}")]
    Credentials(#[from] CredentialError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// process's single session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    session: SessionHandle,
}

impl AppState {
    /// Load the catalog and credential list, then start the session.
    ///
    /// The session stops when `shutdown` is cancelled; the returned task
    /// handle completes once it has.
    ///
    /// # Errors
    ///
    /// Returns an error if an override file is missing or malformed.
    pub fn new(
        config: StorefrontConfig,
        shutdown: CancellationToken,
    ) -> Result<(Self, JoinHandle<()>), StateError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::bundled()?,
        };
        let credentials = match &config.users_path {
            Some(path) => CredentialStore::from_path(path)?,
            None => CredentialStore::bundled()?,
        };
        tracing::info!(
            products = catalog.products().len(),
            users = credentials.len(),
            "Static data loaded"
        );

        let (session, task) = spawn_session(
            Arc::new(catalog),
            Arc::new(credentials),
            config.session,
            shutdown,
        );

        let state = Self {
            inner: Arc::new(AppStateInner { session }),
        };
        Ok((state, task))
    }

    /// Get a reference to the running session.
    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }
}
