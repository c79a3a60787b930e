//! Type-safe price representation using decimal arithmetic.
//!
//! Cart totals are sums of `price × quantity`; doing that in binary floating
//! point turns `7.50 × 2 + 1.50` into `16.499999…`. Prices are therefore
//! kept as [`Decimal`] end to end and only rounded when displayed.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Multiply by a line quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Whether the amount is below zero. Catalog prices never are.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.amount + rhs.amount, self.currency_code)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(CurrencyCode::default()), Add::add)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD => "$",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn usd(amount: &str) -> Price {
        Price::new(Decimal::from_str(amount).unwrap(), CurrencyCode::USD)
    }

    #[test]
    fn test_display_pads_to_two_decimals() {
        assert_eq!(usd("7.5").to_string(), "$7.50");
        assert_eq!(usd("9").to_string(), "$9.00");
        assert_eq!(usd("5.99").to_string(), "$5.99");
    }

    #[test]
    fn test_times_and_sum_are_exact() {
        let total: Price = [usd("7.50").times(2), usd("1.50").times(1)]
            .into_iter()
            .sum();
        assert_eq!(total.amount, Decimal::from_str("16.50").unwrap());
        assert_eq!(total.to_string(), "$16.50");
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let total: Price = std::iter::empty().sum();
        assert_eq!(total.to_string(), "$0.00");
    }

    #[test]
    fn test_is_negative() {
        assert!(!usd("0").is_negative());
        assert!(!usd("1.50").is_negative());
        assert!(usd("-0.01").is_negative());
    }

    #[test]
    fn test_amount_deserializes_from_string() {
        let price: Price = serde_json::from_str(r#"{"amount":"4.75"}"#).unwrap();
        assert_eq!(price, usd("4.75"));
    }
}
