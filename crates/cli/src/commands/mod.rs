//! CLI subcommands.

pub mod catalog;
pub mod replay;

use std::path::Path;

use testhive_storefront::services::catalog::{Catalog, CatalogError};

/// The bundled catalog, or the one at `path`.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog");
            Catalog::from_path(path)
        }
        None => Catalog::bundled(),
    }
}
