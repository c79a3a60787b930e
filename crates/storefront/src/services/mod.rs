//! Business logic services for the storefront session.
//!
//! # Services
//!
//! - `auth` - Credential list and login checks (Auth Gate)
//! - `catalog` - Static product list and the catalog filter
//! - `cart` - Cart lines, quantities, and derived totals
//! - `checkout` - Shipping/payment drafts and order summaries
//!
//! Services are synchronous and own no timers; the session decides when
//! they run and what screen follows.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
