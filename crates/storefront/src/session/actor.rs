//! Event loop that owns one [`Session`].
//!
//! Intents from any number of callers and timer firings are funnelled
//! through a single task, so the session is only ever touched from one
//! place. After each event the loop publishes a fresh snapshot on a watch
//! channel.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use testhive_core::ScreenId;

use crate::services::auth::CredentialStore;
use crate::services::catalog::Catalog;

use super::SessionConfig;
use super::error::SessionError;
use super::intent::Intent;
use super::navigator::Session;
use super::snapshot::SessionSnapshot;
use super::timers::TimerFired;

const COMMAND_BUFFER: usize = 32;

type Reply = oneshot::Sender<Result<SessionSnapshot, SessionError>>;

#[derive(Debug)]
enum Command {
    Dispatch { intent: Intent, reply: Reply },
}

/// The session task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("session is no longer running")]
pub struct SessionClosed;

/// Cheap, cloneable access to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionHandle {
    /// Send an intent and wait for it to be applied.
    ///
    /// The outer result fails only if the session task is gone; the inner
    /// result is the intent's own outcome.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session task has stopped.
    pub async fn dispatch(
        &self,
        intent: Intent,
    ) -> Result<Result<SessionSnapshot, SessionError>, SessionClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Dispatch { intent, reply })
            .await
            .map_err(|_| SessionClosed)?;
        response.await.map_err(|_| SessionClosed)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until the session shows `screen`.
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session stops first.
    pub async fn wait_for_screen(&self, screen: ScreenId) -> Result<SessionSnapshot, SessionClosed> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| snapshot.screen() == screen)
            .await
            .map_err(|_| SessionClosed)?
            .clone();
        Ok(snapshot)
    }
}

/// Start a session on its own task.
///
/// An invalid initial screen is logged and the session starts from the
/// splash screen. The task stops when `shutdown` is cancelled or every
/// handle is dropped.
#[must_use]
pub fn spawn_session(
    catalog: Arc<Catalog>,
    credentials: Arc<CredentialStore>,
    config: SessionConfig,
    shutdown: CancellationToken,
) -> (SessionHandle, JoinHandle<()>) {
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();
    let mut session = Session::new(catalog, credentials, config, timer_tx);
    if let Err(err) = session.start() {
        tracing::error!(error = %err, "Session started from splash instead");
    }

    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

    let task = tokio::spawn(run(session, command_rx, timer_rx, snapshot_tx, shutdown));

    let handle = SessionHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
    };
    (handle, task)
}

async fn run(
    mut session: Session,
    mut commands: mpsc::Receiver<Command>,
    mut timers: mpsc::UnboundedReceiver<TimerFired>,
    snapshots: watch::Sender<SessionSnapshot>,
    shutdown: CancellationToken,
) {
    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                tracing::info!("Session shutting down");
                break;
            }
            command = commands.recv() => {
                let Some(Command::Dispatch { intent, reply }) = command else {
                    tracing::debug!("All session handles dropped");
                    break;
                };
                tracing::debug!(?intent, "Dispatching intent");
                let result = session.dispatch(intent);
                let snapshot = session.snapshot();
                snapshots.send_replace(snapshot.clone());
                // The caller may have given up waiting.
                let _ = reply.send(result.map(|()| snapshot));
            }
            Some(fired) = timers.recv() => {
                session.on_timer(fired);
                snapshots.send_replace(session.snapshot());
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn spawn(config: SessionConfig) -> (SessionHandle, JoinHandle<()>, CancellationToken) {
        let shutdown = CancellationToken::new();
        let (handle, task) = spawn_session(
            Arc::new(Catalog::bundled().unwrap()),
            Arc::new(CredentialStore::bundled().unwrap()),
            config,
            shutdown.clone(),
        );
        (handle, task, shutdown)
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_flow_through_actor() {
        let (handle, _task, _shutdown) = spawn(SessionConfig::default());
        assert_eq!(handle.snapshot().screen(), ScreenId::Splash);

        handle.wait_for_screen(ScreenId::Login).await.unwrap();

        let snapshot = handle
            .dispatch(Intent::login("devicelab", "robustest"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.screen(), ScreenId::Login);

        let snapshot = handle.wait_for_screen(ScreenId::Products).await.unwrap();
        assert_eq!(snapshot.user.unwrap().username, "devicelab");
    }

    #[tokio::test]
    async fn test_dispatch_returns_intent_error() {
        let (handle, _task, _shutdown) = spawn(SessionConfig::immediate());
        let result = handle
            .dispatch(Intent::login("devicelab", "nope"))
            .await
            .unwrap();
        assert_eq!(result, Err(SessionError::InvalidCredentials));
        assert_eq!(
            handle.snapshot().last_error.unwrap().kind,
            "invalid_credentials"
        );
    }

    #[tokio::test]
    async fn test_shutdown_closes_session() {
        let (handle, task, shutdown) = spawn(SessionConfig::immediate());
        shutdown.cancel();
        task.await.unwrap();

        assert_eq!(
            handle.dispatch(Intent::GoBack).await,
            Err(SessionClosed)
        );
    }

    #[tokio::test]
    async fn test_invalid_initial_screen_still_runs() {
        let (handle, _task, _shutdown) = spawn(SessionConfig {
            initial_screen: "cart".to_string(),
            ..SessionConfig::immediate()
        });
        assert_eq!(handle.snapshot().screen(), ScreenId::Login);
        let result = handle.dispatch(Intent::login("a", "a")).await.unwrap();
        assert!(result.is_ok());
    }
}
