//! Read-only view of a session for the presentation layer.
//!
//! Prices are pre-formatted (`$7.50`) so every renderer shows the same text.

use serde::Serialize;

use testhive_core::{ProductId, ScreenId};

use crate::models::{PaymentDraft, Product, ShippingDraft, User};
use crate::services::cart::{Cart, CartItem};

use super::error::LastError;
use super::navigator::Session;
use super::screen::Screen;

/// Everything a renderer needs after an intent or timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub view: ScreenView,
    pub user: Option<User>,
    pub header: Option<HeaderView>,
    pub cart: CartView,
    pub can_checkout: bool,
    pub last_error: Option<LastError>,
}

impl SessionSnapshot {
    /// Capture the current state of `session`.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        let cart = session.cart();
        let user = session.user().cloned();
        let header = user
            .as_ref()
            .filter(|_| session.screen().id().requires_auth())
            .map(|user| HeaderView {
                greeting: format!("Hello, {}!", user.username),
                cart_badge: cart.item_count(),
            });

        Self {
            view: ScreenView::capture(session),
            user,
            header,
            cart: CartView::from(cart),
            can_checkout: !cart.is_empty(),
            last_error: session.last_error().cloned(),
        }
    }

    /// The current screen.
    #[must_use]
    pub const fn screen(&self) -> ScreenId {
        self.view.id()
    }
}

/// Per-screen payload, tagged by `screen`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScreenView {
    Splash,
    Login {
        pending: bool,
    },
    Products {
        query: String,
        applied_query: String,
        category: String,
        categories: Vec<String>,
        products: Vec<ProductView>,
    },
    Detail {
        product: ProductView,
    },
    Cart,
    Address {
        /// Kept from an earlier submission when the user stepped back.
        draft: Option<ShippingDraft>,
    },
    Payment {
        shipping: ShippingDraft,
    },
    CheckoutSuccess {
        order_number: String,
        total: String,
        item_count: u32,
        card_last_four: Option<String>,
    },
}

impl ScreenView {
    fn capture(session: &Session) -> Self {
        let cart = session.cart();
        match session.screen() {
            Screen::Splash => Self::Splash,
            Screen::Login(login) => Self::Login {
                pending: login.pending.is_some(),
            },
            Screen::Products(view) => Self::Products {
                query: view.query.clone(),
                applied_query: view.applied_query.clone(),
                category: view.category.as_option().to_owned(),
                categories: session.catalog().categories(),
                products: session
                    .visible_products()
                    .into_iter()
                    .map(|product| ProductView::new(product, cart))
                    .collect(),
            },
            Screen::Detail { product } => Self::Detail {
                product: ProductView::new(product, cart),
            },
            Screen::Cart => Self::Cart,
            Screen::Address => Self::Address {
                draft: session.checkout_flow().shipping().cloned(),
            },
            Screen::Payment { shipping } => Self::Payment {
                shipping: shipping.clone(),
            },
            Screen::CheckoutSuccess { order } => Self::CheckoutSuccess {
                order_number: order.order_number.to_string(),
                total: order.total.to_string(),
                item_count: order.item_count,
                card_last_four: session
                    .checkout_flow()
                    .payment()
                    .map(PaymentDraft::last_four),
            },
        }
    }

    /// The screen this view belongs to.
    #[must_use]
    pub const fn id(&self) -> ScreenId {
        match self {
            Self::Splash => ScreenId::Splash,
            Self::Login { .. } => ScreenId::Login,
            Self::Products { .. } => ScreenId::Products,
            Self::Detail { .. } => ScreenId::Detail,
            Self::Cart => ScreenId::Cart,
            Self::Address { .. } => ScreenId::Address,
            Self::Payment { .. } => ScreenId::Payment,
            Self::CheckoutSuccess { .. } => ScreenId::CheckoutSuccess,
        }
    }
}

/// Greeting and cart badge shown above post-login screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderView {
    pub greeting: String,
    pub cart_badge: u32,
}

/// A catalog product with the quantity already in the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub rating: f32,
    pub in_stock: bool,
    pub quantity_in_cart: u32,
}

impl ProductView {
    fn new(product: &Product, cart: &Cart) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            category: product.category.clone(),
            rating: product.rating,
            in_stock: product.in_stock,
            quantity_in_cart: cart.quantity_of(&product.id),
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        let product = item.product();
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            unit_price: product.price.to_string(),
            quantity: item.quantity(),
            line_total: item.line_total().to_string(),
        }
    }
}

/// Cart lines in insertion order with derived totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.items().iter().map(CartLineView::from).collect(),
            item_count: cart.item_count(),
            total: cart.total().to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::services::auth::CredentialStore;
    use crate::services::catalog::Catalog;
    use crate::session::{Intent, SessionConfig};

    fn logged_in() -> Session {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CredentialStore::bundled().unwrap()),
            SessionConfig::immediate(),
            tx,
        );
        session.start().unwrap();
        session
            .dispatch(Intent::login("devicelab", "robustest"))
            .unwrap();
        session
    }

    #[test]
    fn test_login_snapshot_has_no_header() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = Session::new(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CredentialStore::bundled().unwrap()),
            SessionConfig::immediate(),
            tx,
        );
        session.start().unwrap();

        let snapshot = session.snapshot();
        assert_eq!(snapshot.screen(), ScreenId::Login);
        assert_eq!(snapshot.view, ScreenView::Login { pending: false });
        assert!(snapshot.header.is_none());
        assert!(!snapshot.can_checkout);
    }

    #[test]
    fn test_products_snapshot() {
        let mut session = logged_in();
        session.dispatch(Intent::add_to_cart("Appium")).unwrap();
        session.dispatch(Intent::add_to_cart("Appium")).unwrap();

        let snapshot = session.snapshot();
        let ScreenView::Products {
            categories,
            products,
            category,
            ..
        } = &snapshot.view
        else {
            panic!("expected products view");
        };
        assert_eq!(category, "All");
        assert_eq!(categories.first().map(String::as_str), Some("All"));
        assert_eq!(categories.len(), 8);
        let appium = products.iter().find(|p| p.id.as_str() == "Appium").unwrap();
        assert_eq!(appium.quantity_in_cart, 2);
        assert_eq!(appium.price, "$7.50");

        let header = snapshot.header.unwrap();
        assert_eq!(header.greeting, "Hello, devicelab!");
        assert_eq!(header.cart_badge, 2);
        assert!(snapshot.can_checkout);
        assert_eq!(snapshot.cart.total, "$15.00");
    }

    #[test]
    fn test_cart_lines() {
        let mut session = logged_in();
        session.dispatch(Intent::add_to_cart("Appium")).unwrap();
        session.dispatch(Intent::add_to_cart("Espresso")).unwrap();
        session.dispatch(Intent::add_to_cart("Appium")).unwrap();

        let cart = session.snapshot().cart;
        let lines: Vec<(&str, u32, &str)> = cart
            .lines
            .iter()
            .map(|l| (l.id.as_str(), l.quantity, l.line_total.as_str()))
            .collect();
        assert_eq!(lines, vec![("Appium", 2, "$15.00"), ("Espresso", 1, "$1.50")]);
        assert_eq!(cart.item_count, 3);
        assert_eq!(cart.total, "$16.50");
    }

    #[test]
    fn test_json_shape() {
        let mut session = logged_in();
        session.dispatch(Intent::select_product("Jest")).unwrap();

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["screen"], "detail");
        assert_eq!(json["product"]["id"], "Jest");
        assert_eq!(json["product"]["inStock"], true);
        assert_eq!(json["header"]["cartBadge"], 0);
        assert_eq!(json["canCheckout"], false);
        assert!(json["lastError"].is_null());
    }

    #[test]
    fn test_success_snapshot() {
        let mut session = logged_in();
        session.dispatch(Intent::add_to_cart("Mocha")).unwrap();
        session.dispatch(Intent::GoToCart).unwrap();
        session.dispatch(Intent::Checkout).unwrap();
        session.dispatch(Intent::submit_address("a", "b", "c")).unwrap();
        session.dispatch(Intent::submit_payment("4242")).unwrap();

        let snapshot = session.snapshot();
        let ScreenView::CheckoutSuccess {
            order_number,
            total,
            item_count,
            card_last_four,
        } = snapshot.view
        else {
            panic!("expected success view");
        };
        assert!(order_number.starts_with('#'));
        assert_eq!(total, "$3.25");
        assert_eq!(item_count, 1);
        assert_eq!(card_last_four.as_deref(), Some("4242"));
        assert_eq!(snapshot.cart.item_count, 0);
    }

    #[test]
    fn test_error_is_visible() {
        let mut session = logged_in();
        let _ = session.dispatch(Intent::add_to_cart("Playwright"));

        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["lastError"]["kind"], "out_of_stock");
        assert_eq!(json["lastError"]["screen"], "products");
    }
}
