//! Checkout drafts and the completed order summary.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use testhive_core::Price;

/// Shipping fields accumulated on the address step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingDraft {
    pub address: String,
    pub city: String,
    pub zip: String,
}

/// Payment field accumulated on the payment step.
///
/// Nothing is charged; the card number is kept only so the success screen
/// can show its last digits.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    card: SecretString,
}

impl PaymentDraft {
    #[must_use]
    pub fn new(card: impl Into<String>) -> Self {
        Self {
            card: SecretString::from(card.into()),
        }
    }

    /// The last four non-space characters of the card, for display.
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self
            .card
            .expose_secret()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let start = digits.len().saturating_sub(4);
        digits.get(start..).unwrap_or_default().iter().collect()
    }
}

/// Cosmetic order number shown after payment.
///
/// No uniqueness guarantee; nothing reconciles against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderNumber(u32);

impl OrderNumber {
    /// Exclusive upper bound of generated order numbers.
    pub const UPPER_BOUND: u32 = 1_000_000;

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Totals captured from the cart at the moment payment was submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub order_number: OrderNumber,
    pub total: Price,
    pub item_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_four_ignores_spaces() {
        assert_eq!(PaymentDraft::new("4242 4242 4242 4321").last_four(), "4321");
    }

    #[test]
    fn test_last_four_short_card() {
        assert_eq!(PaymentDraft::new("12").last_four(), "12");
    }

    #[test]
    fn test_order_number_display() {
        assert_eq!(OrderNumber::new(4217).to_string(), "#4217");
    }
}
