//! The closed set of user intents the session accepts.

use core::fmt;

use serde::Deserialize;

use testhive_core::ProductId;

/// A named user action. Each one triggers at most one state transition.
///
/// On the wire this is internally tagged by `type`:
///
/// ```json
/// {"type": "login", "username": "devicelab", "password": "robustest"}
/// {"type": "add_to_cart", "id": "Appium"}
/// {"type": "logout", "confirmed": true}
/// ```
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum Intent {
    Login {
        username: String,
        password: String,
    },
    /// The presentation layer asks the user to confirm and passes the
    /// answer along; an unconfirmed logout changes nothing.
    Logout {
        #[serde(default)]
        confirmed: bool,
    },
    SelectProduct {
        id: ProductId,
    },
    AddToCart {
        id: ProductId,
    },
    RemoveFromCart {
        id: ProductId,
    },
    SetSearchQuery {
        text: String,
    },
    SetCategory {
        name: String,
    },
    GoToCart,
    GoBack,
    Checkout,
    SubmitAddress {
        address: String,
        city: String,
        zip: String,
    },
    SubmitPayment {
        card: String,
    },
    ContinueShopping,
}

impl Intent {
    /// Wire name of the intent, used in logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout { .. } => "logout",
            Self::SelectProduct { .. } => "select_product",
            Self::AddToCart { .. } => "add_to_cart",
            Self::RemoveFromCart { .. } => "remove_from_cart",
            Self::SetSearchQuery { .. } => "set_search_query",
            Self::SetCategory { .. } => "set_category",
            Self::GoToCart => "go_to_cart",
            Self::GoBack => "go_back",
            Self::Checkout => "checkout",
            Self::SubmitAddress { .. } => "submit_address",
            Self::SubmitPayment { .. } => "submit_payment",
            Self::ContinueShopping => "continue_shopping",
        }
    }

    /// Login intent.
    #[must_use]
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Login {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Add-to-cart intent.
    #[must_use]
    pub fn add_to_cart(id: impl Into<ProductId>) -> Self {
        Self::AddToCart { id: id.into() }
    }

    /// Remove-from-cart intent.
    #[must_use]
    pub fn remove_from_cart(id: impl Into<ProductId>) -> Self {
        Self::RemoveFromCart { id: id.into() }
    }

    /// Select-product intent.
    #[must_use]
    pub fn select_product(id: impl Into<ProductId>) -> Self {
        Self::SelectProduct { id: id.into() }
    }

    /// Address submission intent.
    #[must_use]
    pub fn submit_address(
        address: impl Into<String>,
        city: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self::SubmitAddress {
            address: address.into(),
            city: city.into(),
            zip: zip.into(),
        }
    }

    /// Payment submission intent.
    #[must_use]
    pub fn submit_payment(card: impl Into<String>) -> Self {
        Self::SubmitPayment { card: card.into() }
    }
}

// Passwords and card numbers stay out of logs.
impl fmt::Debug for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::Logout { confirmed } => f
                .debug_struct("Logout")
                .field("confirmed", confirmed)
                .finish(),
            Self::SelectProduct { id } => f.debug_struct("SelectProduct").field("id", id).finish(),
            Self::AddToCart { id } => f.debug_struct("AddToCart").field("id", id).finish(),
            Self::RemoveFromCart { id } => {
                f.debug_struct("RemoveFromCart").field("id", id).finish()
            }
            Self::SetSearchQuery { text } => {
                f.debug_struct("SetSearchQuery").field("text", text).finish()
            }
            Self::SetCategory { name } => f.debug_struct("SetCategory").field("name", name).finish(),
            Self::GoToCart => f.write_str("GoToCart"),
            Self::GoBack => f.write_str("GoBack"),
            Self::Checkout => f.write_str("Checkout"),
            Self::SubmitAddress { address, city, zip } => f
                .debug_struct("SubmitAddress")
                .field("address", address)
                .field("city", city)
                .field("zip", zip)
                .finish(),
            Self::SubmitPayment { .. } => f
                .debug_struct("SubmitPayment")
                .field("card", &"[REDACTED]")
                .finish(),
            Self::ContinueShopping => f.write_str("ContinueShopping"),
        }
    }
}
