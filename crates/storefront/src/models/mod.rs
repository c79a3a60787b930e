//! Domain models for the storefront session.
//!
//! Static data (users, products) is read-only after start-up; checkout
//! models are created by the checkout flow and owned by the session.

pub mod checkout;
pub mod product;
pub mod user;

pub use checkout::{OrderNumber, OrderSummary, PaymentDraft, ShippingDraft};
pub use product::Product;
pub use user::{Credential, User};
