//! Catalog product model.

use serde::Serialize;

use testhive_core::{Price, ProductId};

/// A catalog product. Static and read-only; identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub category: String,
    pub rating: f32,
    pub in_stock: bool,
}

impl Product {
    /// Case-insensitive substring match against name or description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}
