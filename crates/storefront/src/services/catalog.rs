//! Static product catalog and the catalog filter.
//!
//! The filter is a pure function of `(query, category)` over the catalog
//! order. Debouncing of the query is the session's concern; nothing here
//! keeps state between calls.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use testhive_core::{CurrencyCode, Price, ProductId};

use crate::models::Product;

/// Catalog bundled with the binary.
const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

/// Category selector that matches every product.
pub const ALL_CATEGORIES: &str = "All";

/// Errors loading the static catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("reading catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog is not valid JSON of the expected shape.
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),

    /// A product has a negative price.
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),

    /// A product uses the reserved "All" category name.
    #[error("product {0} uses the reserved category name \"All\"")]
    ReservedCategory(ProductId),
}

/// Shape of one entry in the catalog JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: Decimal,
    description: String,
    category: String,
    rating: f32,
    in_stock: bool,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            price: Price::new(record.price, CurrencyCode::USD),
            description: record.description,
            category: record.category,
            rating: record.rating,
            in_stock: record.in_stock,
        }
    }
}

/// Category selection for the catalog filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// The "All" sentinel.
    #[default]
    All,
    /// Exact category name.
    Only(String),
}

impl CategoryFilter {
    /// Interpret a category option as shown to the user.
    #[must_use]
    pub fn from_option(name: &str) -> Self {
        if name == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(name.to_owned())
        }
    }

    /// The option label for this selection.
    #[must_use]
    pub fn as_option(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Only(name) => name,
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(name) => product.category == *name,
        }
    }
}

/// The ordered, read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The catalog shipped in `data/catalog.json`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled data is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Parse a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on malformed JSON, duplicate ids, negative
    /// prices, or a product in the reserved "All" category.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let records: Vec<ProductRecord> = serde_json::from_str(raw)?;
        Self::new(records.into_iter().map(Product::from).collect())
    }

    /// Build a catalog from products, checking its invariants.
    ///
    /// # Errors
    ///
    /// See [`Catalog::from_json`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if product.price.is_negative() {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
            if product.category == ALL_CATEGORIES {
                return Err(CatalogError::ReservedCategory(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    /// "All" followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        std::iter::once(ALL_CATEGORIES.to_owned())
            .chain(
                self.products
                    .iter()
                    .filter(|product| seen.insert(product.category.as_str()))
                    .map(|product| product.category.clone()),
            )
            .collect()
    }

    /// Whether `name` is one of [`Catalog::categories`].
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        name == ALL_CATEGORIES || self.products.iter().any(|p| p.category == name)
    }

    /// The visible subset for a query and category, in catalog order.
    ///
    /// The query matches name or description case-insensitively as a
    /// substring; an empty query matches everything.
    #[must_use]
    pub fn filter(&self, query: &str, category: &CategoryFilter) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| product.matches_lowercase(&needle) && category.matches(product))
            .collect()
    }
}
