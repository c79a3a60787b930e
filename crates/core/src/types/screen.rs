//! Screen identifiers.
//!
//! The storefront is always on exactly one of these screens. The payload a
//! screen carries (selected product, checkout drafts) lives with the
//! session's screen variant; this is only the discriminant, used for
//! logging, error attribution, and the wire format of snapshots.

use serde::{Deserialize, Serialize};

/// Error returned when a screen name does not match any known screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown screen: {0}")]
pub struct InvalidScreenName(pub String);

/// One discrete UI state the navigator can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ScreenId {
    #[default]
    Splash,
    Login,
    Products,
    Detail,
    Cart,
    Address,
    Payment,
    CheckoutSuccess,
}

impl ScreenId {
    /// Every screen, in navigation order.
    pub const ALL: [Self; 8] = [
        Self::Splash,
        Self::Login,
        Self::Products,
        Self::Detail,
        Self::Cart,
        Self::Address,
        Self::Payment,
        Self::CheckoutSuccess,
    ];

    /// The wire name of this screen.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Splash => "splash",
            Self::Login => "login",
            Self::Products => "products",
            Self::Detail => "detail",
            Self::Cart => "cart",
            Self::Address => "address",
            Self::Payment => "payment",
            Self::CheckoutSuccess => "checkoutSuccess",
        }
    }

    /// Whether the screen is only reachable with an authenticated user.
    #[must_use]
    pub const fn requires_auth(&self) -> bool {
        !matches!(self, Self::Splash | Self::Login)
    }
}

impl std::fmt::Display for ScreenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScreenId {
    type Err = InvalidScreenName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.as_str() == s)
            .ok_or_else(|| InvalidScreenName(s.to_owned()))
    }
}
