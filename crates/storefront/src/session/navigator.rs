//! Navigator: the session state machine.
//!
//! All mutation goes through [`Session::dispatch`] (user intents) and
//! [`Session::on_timer`] (elapsed timers). Each call changes at most one
//! state slice plus, possibly, the current screen.
//!
//! ```text
//! splash ──(delay)──▶ login ──login──▶ products ◀──────────────┐
//!                                       │    ▲                  │
//!                          select_product│    │go_back           │continue_shopping
//!                                       ▼    │                  │
//!                                      detail                   │
//! products/detail ──go_to_cart──▶ cart ──checkout──▶ address ──submit──▶ payment ──submit──▶ checkoutSuccess
//!                                  ▲                  │   ▲               │
//!                                  └─────go_back──────┘   └────go_back────┘
//! ```

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;

use testhive_core::{InvalidScreenName, ProductId, ScreenId};

use crate::models::{Product, User};
use crate::services::auth::{self, CredentialStore};
use crate::services::cart::{Cart, Removal};
use crate::services::catalog::{Catalog, CategoryFilter};
use crate::services::checkout::{CheckoutFlow, OrderNumbers};
use crate::validation::{Field, require};

use super::SessionConfig;
use super::error::{LastError, SessionError};
use super::intent::Intent;
use super::screen::{LoginScreen, PendingLogin, Screen};
use super::snapshot::SessionSnapshot;
use super::timers::{Scheduled, TimerFired, TimerKind, Timers};

const fn not_available(intent: &'static str, screen: ScreenId) -> SessionError {
    SessionError::NotAvailable { intent, screen }
}

/// One user's storefront session.
#[derive(Debug)]
pub struct Session {
    catalog: Arc<Catalog>,
    credentials: Arc<CredentialStore>,
    config: SessionConfig,
    screen: Screen,
    user: Option<User>,
    cart: Cart,
    checkout: CheckoutFlow,
    last_error: Option<LastError>,
    order_numbers: OrderNumbers,
    timers: Timers,
}

impl Session {
    /// Create a session on the splash screen. Nothing is scheduled until
    /// [`Session::start`].
    ///
    /// Elapsed timers are posted to `timer_tx`; whoever drives the session
    /// must feed them back through [`Session::on_timer`].
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        credentials: Arc<CredentialStore>,
        config: SessionConfig,
        timer_tx: mpsc::UnboundedSender<TimerFired>,
    ) -> Self {
        let order_numbers = OrderNumbers::new(config.order_seed);
        Self {
            catalog,
            credentials,
            config,
            screen: Screen::Splash,
            user: None,
            cart: Cart::new(),
            checkout: CheckoutFlow::new(),
            last_error: None,
            order_numbers,
            timers: Timers::new(timer_tx),
        }
    }

    /// Enter the configured initial screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidScreen` if the configured screen is
    /// unknown or needs a logged-in user. The session then starts from the
    /// splash screen instead.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let requested = self.config.initial_screen.clone();
        match requested.parse::<ScreenId>() {
            Ok(ScreenId::Splash) => {
                self.enter_splash();
                Ok(())
            }
            Ok(ScreenId::Login) => {
                self.transition(Screen::login());
                Ok(())
            }
            Ok(other) => self.fall_back_to_splash(other.as_str()),
            Err(InvalidScreenName(name)) => self.fall_back_to_splash(&name),
        }
    }

    /// Apply a user intent.
    ///
    /// The previous last error is cleared first. User-correctable failures
    /// are recorded as the new last error and returned.
    ///
    /// # Errors
    ///
    /// Returns the reason the intent was rejected; the session is unchanged
    /// apart from the last error.
    pub fn dispatch(&mut self, intent: Intent) -> Result<(), SessionError> {
        let screen = self.screen.id();
        let name = intent.name();
        self.last_error = None;

        let result = match intent {
            Intent::Login { username, password } => self.login(username, password),
            Intent::Logout { confirmed } => self.logout(confirmed),
            Intent::SelectProduct { id } => self.select_product(&id),
            Intent::AddToCart { id } => self.add_to_cart(&id),
            Intent::RemoveFromCart { id } => self.remove_from_cart(&id),
            Intent::SetSearchQuery { text } => self.set_search_query(text),
            Intent::SetCategory { name } => self.set_category(&name),
            Intent::GoToCart => self.go_to_cart(),
            Intent::GoBack => self.go_back(),
            Intent::Checkout => self.checkout(),
            Intent::SubmitAddress { address, city, zip } => {
                self.submit_address(&address, &city, &zip)
            }
            Intent::SubmitPayment { card } => self.submit_payment(&card),
            Intent::ContinueShopping => self.continue_shopping(),
        };

        if let Err(err) = &result {
            if err.is_user_facing() {
                tracing::debug!(intent = name, %screen, error = %err, "Intent rejected");
                self.last_error = Some(LastError::new(err, screen));
            } else {
                tracing::warn!(intent = name, %screen, error = %err, "Intent not applicable");
            }
        }

        result
    }

    /// Apply an elapsed timer. Stale firings are ignored.
    pub fn on_timer(&mut self, fired: TimerFired) {
        if !self.timers.take_if_current(fired) {
            tracing::debug!(kind = ?fired.kind, generation = fired.generation, "Stale timer ignored");
            return;
        }

        match fired.kind {
            TimerKind::Splash => {
                if matches!(self.screen, Screen::Splash) {
                    self.transition(Screen::login());
                }
            }
            TimerKind::AuthLatency => {
                let Screen::Login(LoginScreen { pending }) = &mut self.screen else {
                    return;
                };
                let Some(attempt) = pending.take() else {
                    return;
                };
                if let Err(err) =
                    self.complete_login(&attempt.username, attempt.password.expose_secret())
                {
                    tracing::debug!(error = %err, "Login failed");
                    self.last_error = Some(LastError::new(&err, ScreenId::Login));
                }
            }
            TimerKind::SearchDebounce => {
                if let Screen::Products(view) = &mut self.screen {
                    view.applied_query.clone_from(&view.query);
                    tracing::debug!(query = %view.applied_query, "Search query applied");
                }
            }
        }
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// The current screen and its payload.
    #[must_use]
    pub const fn screen(&self) -> &Screen {
        &self.screen
    }

    /// The authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Drafts of the checkout in progress.
    #[must_use]
    pub const fn checkout_flow(&self) -> &CheckoutFlow {
        &self.checkout
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Products visible on the products screen; empty on any other screen.
    #[must_use]
    pub fn visible_products(&self) -> Vec<&Product> {
        match &self.screen {
            Screen::Products(view) => self.catalog.filter(&view.applied_query, &view.category),
            _ => Vec::new(),
        }
    }

    /// Whether `kind` has a pending timer.
    #[must_use]
    pub fn timer_armed(&self, kind: TimerKind) -> bool {
        self.timers.is_armed(kind)
    }

    /// Read-only view for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(self)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn transition(&mut self, next: Screen) {
        let from = self.screen.id();
        let to = next.id();
        if from != to {
            self.timers.cancel_owned_by(from);
            tracing::info!(%from, %to, "Screen transition");
        }
        self.screen = next;
    }

    fn enter_splash(&mut self) {
        self.transition(Screen::Splash);
        if self.timers.schedule(TimerKind::Splash, self.config.splash_delay) == Scheduled::Now {
            self.transition(Screen::login());
        }
    }

    fn fall_back_to_splash(&mut self, requested: &str) -> Result<(), SessionError> {
        tracing::error!(screen = requested, "Invalid screen, falling back to splash");
        self.reset();
        self.enter_splash();
        Err(SessionError::InvalidScreen(requested.to_owned()))
    }

    /// Back to pre-auth initial values.
    fn reset(&mut self) {
        self.timers.cancel_all();
        self.screen = Screen::Splash;
        self.user = None;
        self.cart.clear();
        self.checkout.clear();
        self.last_error = None;
    }

    fn go_to_cart(&mut self) -> Result<(), SessionError> {
        match self.screen.id() {
            ScreenId::Products | ScreenId::Detail => {
                self.transition(Screen::Cart);
                Ok(())
            }
            screen => Err(not_available("go_to_cart", screen)),
        }
    }

    /// One step back. Drafts survive inside checkout and are dropped on
    /// returning to the catalog.
    fn go_back(&mut self) -> Result<(), SessionError> {
        let previous = match self.screen.id() {
            ScreenId::Detail | ScreenId::Cart => {
                self.checkout.clear();
                Screen::products()
            }
            ScreenId::Address => Screen::Cart,
            ScreenId::Payment => Screen::Address,
            screen => return Err(not_available("go_back", screen)),
        };
        self.transition(previous);
        Ok(())
    }

    // =========================================================================
    // Auth
    // =========================================================================

    fn login(&mut self, username: String, password: String) -> Result<(), SessionError> {
        let screen = self.screen.id();
        let Screen::Login(login) = &self.screen else {
            return Err(not_available("login", screen));
        };
        if login.pending.is_some() {
            return Err(not_available("login", screen));
        }

        require(&username, Field::Username)?;
        require(&password, Field::Password)?;

        match self
            .timers
            .schedule(TimerKind::AuthLatency, self.config.auth_latency)
        {
            Scheduled::Now => self.complete_login(&username, &password),
            Scheduled::Later(_) => {
                tracing::debug!(username = %username.trim(), "Login pending");
                self.screen = Screen::Login(LoginScreen {
                    pending: Some(PendingLogin {
                        username,
                        password: SecretString::from(password),
                    }),
                });
                Ok(())
            }
        }
    }

    fn complete_login(&mut self, username: &str, password: &str) -> Result<(), SessionError> {
        let user = auth::authenticate(&self.credentials, username, password)?;
        self.user = Some(user);
        self.transition(Screen::products());
        Ok(())
    }

    fn logout(&mut self, confirmed: bool) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if !screen.requires_auth() || self.user.is_none() {
            return Err(not_available("logout", screen));
        }
        if !confirmed {
            tracing::debug!(%screen, "Logout not confirmed");
            return Ok(());
        }

        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "Logged out");
        }
        self.cart.clear();
        self.checkout.clear();
        self.transition(Screen::login());
        Ok(())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    fn product(&self, id: &ProductId) -> Result<Product, SessionError> {
        self.catalog
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownProduct(id.clone()))
    }

    fn select_product(&mut self, id: &ProductId) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::Products {
            return Err(not_available("select_product", screen));
        }
        let product = self.product(id)?;
        self.transition(Screen::Detail { product });
        Ok(())
    }

    fn set_search_query(&mut self, text: String) -> Result<(), SessionError> {
        let screen = self.screen.id();
        let Screen::Products(view) = &mut self.screen else {
            return Err(not_available("set_search_query", screen));
        };

        view.query = text;
        if self
            .timers
            .schedule(TimerKind::SearchDebounce, self.config.search_debounce)
            == Scheduled::Now
        {
            view.applied_query.clone_from(&view.query);
        }
        Ok(())
    }

    fn set_category(&mut self, name: &str) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::Products {
            return Err(not_available("set_category", screen));
        }
        if !self.catalog.has_category(name) {
            return Err(SessionError::UnknownCategory(name.to_owned()));
        }
        if let Screen::Products(view) = &mut self.screen {
            view.category = CategoryFilter::from_option(name);
        }
        Ok(())
    }

    // =========================================================================
    // Cart
    // =========================================================================

    const fn cart_controls_shown(screen: ScreenId) -> bool {
        matches!(
            screen,
            ScreenId::Products | ScreenId::Detail | ScreenId::Cart
        )
    }

    fn add_to_cart(&mut self, id: &ProductId) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if !Self::cart_controls_shown(screen) {
            return Err(not_available("add_to_cart", screen));
        }
        let product = self.product(id)?;
        let quantity = self.cart.add(&product)?;
        tracing::debug!(product = %id, quantity, "Added to cart");
        Ok(())
    }

    fn remove_from_cart(&mut self, id: &ProductId) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if !Self::cart_controls_shown(screen) {
            return Err(not_available("remove_from_cart", screen));
        }
        self.product(id)?;
        match self.cart.remove(id) {
            Removal::Absent => tracing::debug!(product = %id, "Not in cart"),
            Removal::Decremented(quantity) => {
                tracing::debug!(product = %id, quantity, "Removed one from cart");
            }
            Removal::Removed => tracing::debug!(product = %id, "Removed from cart"),
        }
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    fn checkout(&mut self) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::Cart {
            return Err(not_available("checkout", screen));
        }
        if self.cart.is_empty() {
            tracing::warn!("Checkout started with an empty cart");
        }
        self.transition(Screen::Address);
        Ok(())
    }

    fn submit_address(&mut self, address: &str, city: &str, zip: &str) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::Address {
            return Err(not_available("submit_address", screen));
        }
        let shipping = self.checkout.submit_address(address, city, zip)?;
        self.transition(Screen::Payment { shipping });
        Ok(())
    }

    fn submit_payment(&mut self, card: &str) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::Payment {
            return Err(not_available("submit_payment", screen));
        }
        let order = self
            .checkout
            .submit_payment(card, &self.cart, &mut self.order_numbers)?;
        tracing::info!(
            order_number = %order.order_number,
            total = %order.total,
            item_count = order.item_count,
            "Order placed"
        );
        self.cart.clear();
        self.transition(Screen::CheckoutSuccess { order });
        Ok(())
    }

    fn continue_shopping(&mut self) -> Result<(), SessionError> {
        let screen = self.screen.id();
        if screen != ScreenId::CheckoutSuccess {
            return Err(not_available("continue_shopping", screen));
        }
        self.cart.clear();
        self.checkout.clear();
        self.transition(Screen::products());
        Ok(())
    }
}
