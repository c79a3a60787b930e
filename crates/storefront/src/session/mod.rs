//! The storefront session: screens, intents, and the rules that keep them
//! consistent.
//!
//! # Structure
//!
//! - [`navigator`] - [`Session`], the state machine every intent goes through
//! - [`screen`] - the current screen as a tagged union with its payload
//! - [`intent`] - the closed set of user intents
//! - [`timers`] - cancellable splash, auth-latency, and debounce timers
//! - [`snapshot`] - read-only view for the presentation layer
//! - [`actor`] - event loop that owns a session and serialises access to it

pub mod actor;
pub mod error;
pub mod intent;
pub mod navigator;
pub mod screen;
pub mod snapshot;
pub mod timers;

use std::time::Duration;

pub use actor::{SessionClosed, SessionHandle, spawn_session};
pub use error::{LastError, SessionError};
pub use intent::Intent;
pub use navigator::Session;
pub use screen::Screen;
pub use snapshot::SessionSnapshot;
pub use timers::{TimerFired, TimerKind};

/// Timing and start-up settings for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long the splash screen stays before moving to login.
    pub splash_delay: Duration,
    /// Simulated latency between a login attempt and its result.
    pub auth_latency: Duration,
    /// How long the search box must be still before the list refilters.
    pub search_debounce: Duration,
    /// Screen name to start on. Only `splash` and `login` are accepted.
    pub initial_screen: String,
    /// Seed for order numbers; `None` draws from the OS.
    pub order_seed: Option<u64>,
}

impl SessionConfig {
    pub const DEFAULT_SPLASH_DELAY: Duration = Duration::from_millis(2000);
    pub const DEFAULT_AUTH_LATENCY: Duration = Duration::from_millis(1000);
    pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

    /// No delays anywhere: every timed effect applies inline.
    ///
    /// Used by tests and scripted replays.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            splash_delay: Duration::ZERO,
            auth_latency: Duration::ZERO,
            search_debounce: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            splash_delay: Self::DEFAULT_SPLASH_DELAY,
            auth_latency: Self::DEFAULT_AUTH_LATENCY,
            search_debounce: Self::DEFAULT_SEARCH_DEBOUNCE,
            initial_screen: testhive_core::ScreenId::Splash.to_string(),
            order_seed: None,
        }
    }
}
