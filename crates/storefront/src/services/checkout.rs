//! Checkout flow: drafts accumulated across the address and payment steps.
//!
//! The flow only moves forward. Stepping back is the navigator's job and
//! leaves the drafts in place so re-advancing finds them again.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{OrderNumber, OrderSummary, PaymentDraft, ShippingDraft};
use crate::services::cart::Cart;
use crate::validation::{Field, ValidationError, require};

/// Source of cosmetic order numbers.
#[derive(Debug, Clone)]
pub struct OrderNumbers {
    rng: StdRng,
}

impl OrderNumbers {
    /// Seeded generators repeat their sequence; unseeded ones draw from the
    /// OS.
    #[must_use]
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self { rng }
    }

    /// A number in `0..OrderNumber::UPPER_BOUND`.
    pub fn next_number(&mut self) -> OrderNumber {
        OrderNumber::new(self.rng.random_range(0..OrderNumber::UPPER_BOUND))
    }
}

/// Drafts for the checkout in progress.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    shipping: Option<ShippingDraft>,
    payment: Option<PaymentDraft>,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            shipping: None,
            payment: None,
        }
    }

    /// Validate and store the shipping fields.
    ///
    /// Fields are checked in form order; nothing is stored unless all three
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` naming the first blank field.
    pub fn submit_address(
        &mut self,
        address: &str,
        city: &str,
        zip: &str,
    ) -> Result<ShippingDraft, ValidationError> {
        let draft = ShippingDraft {
            address: require(address, Field::Address)?.to_owned(),
            city: require(city, Field::City)?.to_owned(),
            zip: require(zip, Field::Zip)?.to_owned(),
        };
        self.shipping = Some(draft.clone());
        Ok(draft)
    }

    /// Validate and store the card, then summarise `cart` into an order.
    ///
    /// The summary's total and item count are read from the cart as it is at
    /// this moment.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the card is blank; nothing is stored.
    pub fn submit_payment(
        &mut self,
        card: &str,
        cart: &Cart,
        numbers: &mut OrderNumbers,
    ) -> Result<OrderSummary, ValidationError> {
        let card = require(card, Field::Card)?;
        self.payment = Some(PaymentDraft::new(card));

        Ok(OrderSummary {
            order_number: numbers.next_number(),
            total: cart.total(),
            item_count: cart.item_count(),
        })
    }

    /// The last submitted shipping draft, if any.
    #[must_use]
    pub const fn shipping(&self) -> Option<&ShippingDraft> {
        self.shipping.as_ref()
    }

    /// The last submitted payment draft, if any.
    #[must_use]
    pub const fn payment(&self) -> Option<&PaymentDraft> {
        self.payment.as_ref()
    }

    /// Drop both drafts.
    pub fn clear(&mut self) {
        self.shipping = None;
        self.payment = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use testhive_core::ProductId;

    use super::*;
    use crate::services::catalog::Catalog;

    #[test]
    fn test_submit_address_stores_trimmed_draft() {
        let mut flow = CheckoutFlow::new();
        let draft = flow
            .submit_address(" 123 Main St ", "San Francisco", "94105")
            .unwrap();
        assert_eq!(draft.address, "123 Main St");
        assert_eq!(flow.shipping(), Some(&draft));
    }

    #[test]
    fn test_submit_address_blank_field_stores_nothing() {
        let mut flow = CheckoutFlow::new();
        assert_eq!(
            flow.submit_address("", "city", "zip"),
            Err(ValidationError {
                field: Field::Address
            })
        );
        assert_eq!(
            flow.submit_address("street", "city", "   "),
            Err(ValidationError { field: Field::Zip })
        );
        assert!(flow.shipping().is_none());
    }

    #[test]
    fn test_failed_resubmit_keeps_previous_draft() {
        let mut flow = CheckoutFlow::new();
        flow.submit_address("1 Loop", "Cupertino", "95014").unwrap();
        assert!(flow.submit_address("1 Loop", "", "95014").is_err());
        assert_eq!(flow.shipping().unwrap().city, "Cupertino");
    }

    #[test]
    fn test_submit_payment_summarises_cart() {
        let catalog = Catalog::bundled().unwrap();
        let mut cart = Cart::new();
        let appium = catalog.get(&ProductId::new("Appium")).unwrap();
        let espresso = catalog.get(&ProductId::new("Espresso")).unwrap();
        cart.add(appium).unwrap();
        cart.add(appium).unwrap();
        cart.add(espresso).unwrap();

        let mut flow = CheckoutFlow::new();
        let mut numbers = OrderNumbers::new(Some(7));
        let summary = flow.submit_payment("4242", &cart, &mut numbers).unwrap();

        assert_eq!(summary.total.to_string(), "$16.50");
        assert_eq!(summary.item_count, 3);
        assert!(summary.order_number.as_u32() < OrderNumber::UPPER_BOUND);
        assert_eq!(flow.payment().unwrap().last_four(), "4242");
    }

    #[test]
    fn test_submit_payment_blank_card() {
        let mut flow = CheckoutFlow::new();
        let mut numbers = OrderNumbers::new(Some(7));
        assert_eq!(
            flow.submit_payment(" ", &Cart::new(), &mut numbers)
                .unwrap_err(),
            ValidationError { field: Field::Card }
        );
        assert!(flow.payment().is_none());
    }

    #[test]
    fn test_seeded_numbers_repeat() {
        let mut a = OrderNumbers::new(Some(42));
        let mut b = OrderNumbers::new(Some(42));
        for _ in 0..5 {
            assert_eq!(a.next_number(), b.next_number());
        }
    }

    #[test]
    fn test_clear() {
        let mut flow = CheckoutFlow::new();
        flow.submit_address("a", "b", "c").unwrap();
        flow.submit_payment("1", &Cart::new(), &mut OrderNumbers::new(None))
            .unwrap();
        flow.clear();
        assert!(flow.shipping().is_none());
        assert!(flow.payment().is_none());
    }
}
