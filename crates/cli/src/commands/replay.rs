//! Scripted replay of intents against a fresh session.
//!
//! A script is a YAML list. Each step is either an intent, tagged by
//! `type` exactly as `POST /intents` accepts it, or a pause:
//!
//! ```yaml
//! - wait_ms: 2100
//! - type: login
//!   username: devicelab
//!   password: robustest
//! - type: add_to_cart
//!   id: Appium
//! ```
//!
//! Timing comes from the usual `STOREFRONT_*_MS` variables unless
//! `--immediate` is given.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use testhive_core::ScreenId;
use testhive_storefront::config::{ConfigError, StorefrontConfig};
use testhive_storefront::services::auth::{CredentialError, CredentialStore};
use testhive_storefront::services::catalog::Catalog;
use testhive_storefront::session::{
    Intent, SessionClosed, SessionConfig, SessionError, SessionHandle, spawn_session,
};

/// Errors that stop a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("reading script: {0}")]
    Read(#[from] std::io::Error),
    #[error("parsing script: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("credentials: {0}")]
    Credentials(#[from] CredentialError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Closed(#[from] SessionClosed),
}

/// One script step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Let timers run.
    Wait { wait_ms: u64 },
    /// Send an intent.
    Intent(Intent),
}

/// What the session looked like after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub screen: ScreenId,
    pub cart_total: String,
    pub error: Option<SessionError>,
}

/// Parse a YAML script.
///
/// # Errors
///
/// Returns an error if the YAML is not a list of steps.
pub fn parse_script(raw: &str) -> Result<Vec<Step>, ReplayError> {
    Ok(serde_yaml::from_str(raw)?)
}

/// Run `steps` in order. Rejected intents are recorded, not fatal.
///
/// # Errors
///
/// Returns `SessionClosed` if the session stops mid-script.
pub async fn play(handle: &SessionHandle, steps: &[Step]) -> Result<Vec<StepOutcome>, SessionClosed> {
    let mut outcomes = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let (snapshot, error) = match step {
            Step::Wait { wait_ms } => {
                tokio::time::sleep(Duration::from_millis(*wait_ms)).await;
                (handle.snapshot(), None)
            }
            Step::Intent(intent) => match handle.dispatch(intent.clone()).await? {
                Ok(snapshot) => (snapshot, None),
                Err(err) => (handle.snapshot(), Some(err)),
            },
        };

        let outcome = StepOutcome {
            screen: snapshot.screen(),
            cart_total: snapshot.cart.total,
            error,
        };
        match &outcome.error {
            None => info!(
                step = index + 1,
                screen = %outcome.screen,
                cart_total = %outcome.cart_total,
                "Step applied"
            ),
            Some(err) => warn!(
                step = index + 1,
                screen = %outcome.screen,
                kind = err.kind(),
                error = %err,
                "Step rejected"
            ),
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Load a script and replay it against a fresh session.
///
/// # Errors
///
/// Returns an error if the script, credential list, or configuration
/// cannot be loaded.
pub async fn run(
    catalog: Catalog,
    users: Option<&Path>,
    script: &Path,
    immediate: bool,
) -> Result<(), ReplayError> {
    let raw = tokio::fs::read_to_string(script).await?;
    let steps = parse_script(&raw)?;
    info!(path = %script.display(), steps = steps.len(), "Loaded script");

    let credentials = match users {
        Some(path) => CredentialStore::from_path(path)?,
        None => CredentialStore::bundled()?,
    };
    let config = if immediate {
        SessionConfig::immediate()
    } else {
        StorefrontConfig::from_env()?.session
    };

    let shutdown = CancellationToken::new();
    let (handle, task) = spawn_session(
        Arc::new(catalog),
        Arc::new(credentials),
        config,
        shutdown.clone(),
    );

    let outcomes = play(&handle, &steps).await?;

    shutdown.cancel();
    if let Err(err) = task.await {
        warn!(error = %err, "Session task failed");
    }

    let rejected = outcomes.iter().filter(|o| o.error.is_some()).count();
    let last = handle.snapshot();
    info!(
        steps = outcomes.len(),
        rejected,
        screen = %last.screen(),
        cart_total = %last.cart.total,
        "Replay finished"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DEMO: &str = include_str!("../../demos/checkout.yaml");

    fn spawn(config: SessionConfig) -> SessionHandle {
        let (handle, _task) = spawn_session(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CredentialStore::bundled().unwrap()),
            config,
            CancellationToken::new(),
        );
        handle
    }

    #[test]
    fn test_parse_steps() {
        let steps = parse_script(
            "- wait_ms: 10\n- type: go_to_cart\n- type: add_to_cart\n  id: Jest\n",
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Wait { wait_ms: 10 },
                Step::Intent(Intent::GoToCart),
                Step::Intent(Intent::add_to_cart("Jest")),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_unknown_intent() {
        assert!(parse_script("- type: teleport\n").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_script_with_real_delays() {
        let steps = parse_script(DEMO).unwrap();
        let handle = spawn(SessionConfig::default());

        let outcomes = play(&handle, &steps).await.unwrap();
        assert_eq!(outcomes.len(), steps.len());

        let rejected: Vec<&str> = outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(SessionError::kind))
            .collect();
        assert_eq!(rejected, vec!["out_of_stock", "validation_error"]);

        let payment = outcomes
            .iter()
            .position(|o| o.screen == ScreenId::CheckoutSuccess)
            .unwrap();
        let before_payment = outcomes.get(payment - 1).unwrap();
        assert_eq!(before_payment.screen, ScreenId::Payment);
        assert_eq!(before_payment.cart_total, "$16.50");

        assert_eq!(outcomes.last().unwrap().screen, ScreenId::Login);
    }

    #[tokio::test]
    async fn test_immediate_script_needs_no_waits() {
        let steps = parse_script(
            "- type: login\n  username: a\n  password: a\n- type: add_to_cart\n  id: Mocha\n",
        )
        .unwrap();
        let handle = spawn(SessionConfig::immediate());

        let outcomes = play(&handle, &steps).await.unwrap();
        let last = outcomes.last().unwrap();
        assert_eq!(last.screen, ScreenId::Products);
        assert_eq!(last.cart_total, "$3.25");
        assert!(last.error.is_none());
    }
}
