//! Cart store.
//!
//! Holds at most one line per product id, in the order products were first
//! added. Quantities are at least 1; a decrement from 1 drops the line.
//! Totals are computed from the lines on every call.

use serde::Serialize;

use testhive_core::{Price, ProductId};

use crate::models::Product;

/// Why an add was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{product} is currently out of stock")]
pub struct OutOfStock {
    pub product: ProductId,
}

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// What a remove did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The product was not in the cart.
    Absent,
    /// Quantity went down by one.
    Decremented(u32),
    /// The line was dropped.
    Removed,
}

/// The session's cart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add one unit of `product`.
    ///
    /// Returns the new quantity of that line.
    ///
    /// # Errors
    ///
    /// Returns `OutOfStock` without touching the cart if the product is
    /// unavailable.
    pub fn add(&mut self, product: &Product) -> Result<u32, OutOfStock> {
        if !product.in_stock {
            return Err(OutOfStock {
                product: product.id.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return Ok(item.quantity);
        }

        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        Ok(1)
    }

    /// Remove one unit of the product with `id`.
    pub fn remove(&mut self, id: &ProductId) -> Removal {
        let Some(index) = self.items.iter().position(|i| i.product.id == *id) else {
            return Removal::Absent;
        };

        match self.items.get_mut(index) {
            Some(item) if item.quantity > 1 => {
                item.quantity -= 1;
                Removal::Decremented(item.quantity)
            }
            _ => {
                self.items.remove(index);
                Removal::Removed
            }
        }
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Quantity of `id` in the cart, 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.items
            .iter()
            .find(|i| i.product.id == *id)
            .map_or(0, CartItem::quantity)
    }

    /// Σ quantity.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    /// Σ price × quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
