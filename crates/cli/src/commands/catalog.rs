//! Catalog listing commands.
//!
//! # Usage
//!
//! ```bash
//! th-cli catalog --query javascript
//! th-cli catalog --category "Mobile Testing"
//! th-cli categories
//! ```

use thiserror::Error;
use tracing::{info, warn};

use testhive_storefront::services::catalog::{Catalog, CategoryFilter};

/// The category is not one of the catalog's options.
#[derive(Debug, Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(String);

/// List the products visible for `query` and `category`.
///
/// # Errors
///
/// Returns an error if `category` is not a catalog option.
pub fn list(catalog: &Catalog, query: &str, category: &str) -> Result<(), UnknownCategory> {
    if !catalog.has_category(category) {
        return Err(UnknownCategory(category.to_owned()));
    }

    let products = catalog.filter(query, &CategoryFilter::from_option(category));
    if products.is_empty() {
        warn!(query, category, "No products match");
        return Ok(());
    }

    for product in &products {
        info!(
            id = %product.id,
            price = %product.price,
            category = %product.category,
            rating = product.rating,
            in_stock = product.in_stock,
            "{}",
            product.name
        );
    }
    info!(count = products.len(), "Products listed");
    Ok(())
}

/// List category options in display order, "All" first.
pub fn categories(catalog: &Catalog) {
    for (position, name) in catalog.categories().iter().enumerate() {
        info!(position, "{name}");
    }
}
