//! The current screen and the payload only that screen may carry.
//!
//! Illegal combinations are unrepresentable: a selected product exists only
//! inside `Detail`, an order summary only inside `CheckoutSuccess`, and the
//! catalog query only while `Products` is shown.

use secrecy::SecretString;

use testhive_core::ScreenId;

use crate::models::{OrderSummary, Product, ShippingDraft};
use crate::services::catalog::CategoryFilter;

/// A login whose simulated latency is still running.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub username: String,
    pub password: SecretString,
}

/// Login screen state.
#[derive(Debug, Clone, Default)]
pub struct LoginScreen {
    pub pending: Option<PendingLogin>,
}

/// Search and category inputs of the products screen.
///
/// `query` is what the user has typed; `applied_query` is what the list is
/// filtered by, and catches up once typing has settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogView {
    pub query: String,
    pub applied_query: String,
    pub category: CategoryFilter,
}

/// The active screen with its payload.
#[derive(Debug, Clone, Default)]
pub enum Screen {
    #[default]
    Splash,
    Login(LoginScreen),
    Products(CatalogView),
    Detail { product: Product },
    Cart,
    Address,
    Payment { shipping: ShippingDraft },
    CheckoutSuccess { order: OrderSummary },
}

impl Screen {
    /// The discriminant.
    #[must_use]
    pub const fn id(&self) -> ScreenId {
        match self {
            Self::Splash => ScreenId::Splash,
            Self::Login(_) => ScreenId::Login,
            Self::Products(_) => ScreenId::Products,
            Self::Detail { .. } => ScreenId::Detail,
            Self::Cart => ScreenId::Cart,
            Self::Address => ScreenId::Address,
            Self::Payment { .. } => ScreenId::Payment,
            Self::CheckoutSuccess { .. } => ScreenId::CheckoutSuccess,
        }
    }

    /// Fresh login screen.
    #[must_use]
    pub fn login() -> Self {
        Self::Login(LoginScreen::default())
    }

    /// Fresh products screen: empty query, "All" categories.
    #[must_use]
    pub fn products() -> Self {
        Self::Products(CatalogView::default())
    }

    /// The product shown on the detail screen.
    #[must_use]
    pub const fn selected_product(&self) -> Option<&Product> {
        match self {
            Self::Detail { product } => Some(product),
            _ => None,
        }
    }

    /// The summary shown on the success screen.
    #[must_use]
    pub const fn order_summary(&self) -> Option<&OrderSummary> {
        match self {
            Self::CheckoutSuccess { order } => Some(order),
            _ => None,
        }
    }
}
