//! Cancellable scheduled tasks owned by the session.
//!
//! Each timer kind has at most one armed instance. Arming a kind again
//! cancels the previous instance. A timer that fires posts a
//! [`TimerFired`] back to the session's event loop; the session only acts
//! on it if its generation is still the armed one, so a late delivery from
//! a cancelled task is dropped.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use testhive_core::ScreenId;

/// The three timed effects in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Splash screen to login.
    Splash,
    /// Simulated authentication latency.
    AuthLatency,
    /// Search query settle time.
    SearchDebounce,
}

impl TimerKind {
    /// The screen whose state the timer belongs to. Leaving that screen
    /// cancels it.
    #[must_use]
    pub const fn owner(&self) -> ScreenId {
        match self {
            Self::Splash => ScreenId::Splash,
            Self::AuthLatency => ScreenId::Login,
            Self::SearchDebounce => ScreenId::Products,
        }
    }

    const ALL: [Self; 3] = [Self::Splash, Self::AuthLatency, Self::SearchDebounce];
}

/// Delivered to the session when an armed timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub kind: TimerKind,
    pub generation: u64,
}

/// Result of arming a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// Zero delay: the caller applies the effect now.
    Now,
    /// A task was spawned and will report back with this generation.
    Later(u64),
}

#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    cancel: CancellationToken,
}

/// The session's timer slots.
#[derive(Debug)]
pub struct Timers {
    tx: mpsc::UnboundedSender<TimerFired>,
    generation: u64,
    armed: HashMap<TimerKind, ArmedTimer>,
}

impl Timers {
    /// Timers that report to `tx`.
    #[must_use]
    pub fn new(tx: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            tx,
            generation: 0,
            armed: HashMap::new(),
        }
    }

    /// Arm `kind` to fire after `delay`, replacing any armed instance.
    ///
    /// A non-zero delay spawns onto the current tokio runtime.
    pub fn schedule(&mut self, kind: TimerKind, delay: Duration) -> Scheduled {
        self.cancel(kind);

        if delay.is_zero() {
            return Scheduled::Now;
        }

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let cancel = CancellationToken::new();
        self.armed.insert(
            kind,
            ArmedTimer {
                generation,
                cancel: cancel.clone(),
            },
        );

        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = sleep(delay) => {
                    // The receiver is gone only when the session is shutting down.
                    let _ = tx.send(TimerFired { kind, generation });
                }
            }
        });

        tracing::trace!(?kind, generation, ?delay, "Timer armed");
        Scheduled::Later(generation)
    }

    /// Cancel the armed instance of `kind`, if any.
    pub fn cancel(&mut self, kind: TimerKind) {
        if let Some(armed) = self.armed.remove(&kind) {
            armed.cancel.cancel();
            tracing::trace!(?kind, generation = armed.generation, "Timer cancelled");
        }
    }

    /// Cancel every timer owned by `screen`.
    pub fn cancel_owned_by(&mut self, screen: ScreenId) {
        for kind in TimerKind::ALL {
            if kind.owner() == screen {
                self.cancel(kind);
            }
        }
    }

    /// Cancel everything.
    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.cancel(kind);
        }
    }

    /// Whether `kind` currently has an armed instance.
    #[must_use]
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    /// Consume a firing. Returns `false` if it is stale.
    pub fn take_if_current(&mut self, fired: TimerFired) -> bool {
        match self.armed.get(&fired.kind) {
            Some(armed) if armed.generation == fired.generation => {
                self.armed.remove(&fired.kind);
                true
            }
            _ => false,
        }
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
