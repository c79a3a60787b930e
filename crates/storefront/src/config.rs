//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_SPLASH_DELAY_MS` - Splash screen duration (default: 2000)
//! - `STOREFRONT_AUTH_LATENCY_MS` - Simulated login latency (default: 1000)
//! - `STOREFRONT_SEARCH_DEBOUNCE_MS` - Search settle time (default: 300)
//! - `STOREFRONT_INITIAL_SCREEN` - `splash` or `login` (default: splash)
//! - `STOREFRONT_ORDER_SEED` - Seed for reproducible order numbers
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog replacing the bundled one
//! - `STOREFRONT_USERS_PATH` - JSON credential list replacing the bundled one
//! - `STOREFRONT_LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::session::SessionConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Timing and start-up settings handed to the session
    pub session: SessionConfig,
    /// Catalog override; the bundled catalog is used when unset
    pub catalog_path: Option<PathBuf>,
    /// Credential list override; the bundled list is used when unset
    pub users_path: Option<PathBuf>,
    /// Emit logs as JSON lines instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production", "staging")
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_or_default(&lookup, "STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_or_default(&lookup, "STOREFRONT_PORT", 3000)?;

        let session = SessionConfig {
            splash_delay: millis_or_default(
                &lookup,
                "STOREFRONT_SPLASH_DELAY_MS",
                SessionConfig::DEFAULT_SPLASH_DELAY,
            )?,
            auth_latency: millis_or_default(
                &lookup,
                "STOREFRONT_AUTH_LATENCY_MS",
                SessionConfig::DEFAULT_AUTH_LATENCY,
            )?,
            search_debounce: millis_or_default(
                &lookup,
                "STOREFRONT_SEARCH_DEBOUNCE_MS",
                SessionConfig::DEFAULT_SEARCH_DEBOUNCE,
            )?,
            initial_screen: lookup("STOREFRONT_INITIAL_SCREEN")
                .unwrap_or_else(|| SessionConfig::default().initial_screen),
            order_seed: parse_optional(&lookup, "STOREFRONT_ORDER_SEED")?,
        };

        Ok(Self {
            host,
            port,
            session,
            catalog_path: lookup("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            users_path: lookup("STOREFRONT_USERS_PATH").map(PathBuf::from),
            log_json: lookup("STOREFRONT_LOG_FORMAT")
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an optional environment variable.
fn parse_optional<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
        .transpose()
}

/// Parse an environment variable with a default value.
fn parse_or_default<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

/// Parse a millisecond duration with a default value.
fn millis_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    Ok(parse_optional::<u64>(lookup, key)?.map_or(default, Duration::from_millis))
}
