//! TestHive Core - Shared types library.
//!
//! This crate provides common types used across all TestHive components:
//! - `storefront` - Session state machine and its JSON presentation boundary
//! - `cli` - Command-line tools for browsing the catalog and replaying sessions
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no timers, no HTTP. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices, emails, and screens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
