//! Integration tests for TestHive.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p testhive-integration-tests
//! ```
//!
//! Each test boots the storefront router on an ephemeral port with its own
//! session and drives it over HTTP.
//!
//! # Test Categories
//!
//! - `storefront_flow` - login, cart, and checkout through `POST /intents`
//! - `storefront_errors` - error statuses and bodies
//! - `storefront_timers` - splash, login latency, and search debounce

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use testhive_storefront::config::StorefrontConfig;
use testhive_storefront::state::AppState;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
const POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// A running storefront and a client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    shutdown: CancellationToken,
}

impl TestContext {
    /// Storefront with every delay set to zero.
    pub async fn start() -> Self {
        Self::with_env(&[]).await
    }

    /// Storefront configured from `vars`, as if they were the environment.
    ///
    /// Delays not named in `vars` default to zero.
    pub async fn with_env(vars: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = [
            "STOREFRONT_SPLASH_DELAY_MS",
            "STOREFRONT_AUTH_LATENCY_MS",
            "STOREFRONT_SEARCH_DEBOUNCE_MS",
        ]
        .into_iter()
        .map(|key| (key.to_string(), "0".to_string()))
        .collect();
        env.extend(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())));

        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned())
            .expect("valid test configuration");

        let shutdown = CancellationToken::new();
        let (state, _session) =
            AppState::new(config, shutdown.clone()).expect("bundled data loads");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("listener address");

        let app = testhive_storefront::app(state);
        let stop = shutdown.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await;
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            shutdown,
        }
    }

    /// `GET /state`.
    pub async fn state(&self) -> Value {
        self.client
            .get(format!("{}/state", self.base_url))
            .send()
            .await
            .expect("GET /state")
            .json()
            .await
            .expect("snapshot JSON")
    }

    /// `POST /intents` with `intent`, returning the status and JSON body.
    pub async fn intent(&self, intent: Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(format!("{}/intents", self.base_url))
            .json(&intent)
            .send()
            .await
            .expect("POST /intents");
        let status = response.status();
        let body = response.json().await.expect("JSON body");
        (status, body)
    }

    /// Send an intent that must succeed and return the new snapshot.
    pub async fn ok(&self, intent: Value) -> Value {
        let (status, body) = self.intent(intent).await;
        assert_eq!(status, StatusCode::OK, "unexpected response: {body}");
        body
    }

    /// Log in as the demo user.
    pub async fn login(&self) -> Value {
        self.ok(json!({"type": "login", "username": "devicelab", "password": "robustest"}))
            .await
    }

    /// Poll `GET /state` until `predicate` holds.
    pub async fn wait_until(&self, predicate: impl Fn(&Value) -> bool) -> Value {
        let deadline = tokio::time::Instant::now() + POLL_TIMEOUT;
        loop {
            let state = self.state().await;
            if predicate(&state) {
                return state;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "condition not reached, last state: {state}"
            );
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Poll `GET /state` until the session shows `screen`.
    pub async fn wait_for_screen(&self, screen: &str) -> Value {
        self.wait_until(|state| state["screen"] == screen).await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
