//! Shutdown coordination for the server.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;

/// Serving state, advanced only by [`Shutdown`].
///
/// Starting → Running → Draining → Stopped. Draining is entered exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Running,
    Draining,
    Stopped,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Draining => "draining",
            LifecycleState::Stopped => "stopped",
        }
    }
}

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every accepted request finished inside the grace period.
    Clean,
    /// The grace period elapsed; this many requests were abandoned.
    Forced { abandoned: u64 },
}

/// Coordinator for graceful shutdown.
///
/// Holds the one-shot shutdown signal, the lifecycle state and the count of
/// requests currently being served.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
    state: ArcSwap<LifecycleState>,
    in_flight: Arc<AtomicU64>,
}

impl Shutdown {
    /// Create a new shutdown coordinator in the `Starting` state.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            tx,
            state: ArcSwap::from_pointee(LifecycleState::Starting),
            in_flight: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    /// Resolves once shutdown has been triggered.
    pub async fn triggered(&self) {
        let mut rx = self.subscribe();
        // Cannot fail: the sender is owned by `self`.
        let _ = rx.wait_for(|triggered| *triggered).await;
    }

    /// Trigger the shutdown signal. Later calls are no-ops.
    pub fn trigger(&self) {
        let first = self.tx.send_if_modified(|triggered| {
            let changed = !*triggered;
            *triggered = true;
            changed
        });
        if first {
            self.transition(LifecycleState::Draining);
        }
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn state(&self) -> LifecycleState {
        **self.state.load()
    }

    /// Mark the server as accepting connections.
    pub fn mark_running(&self) {
        if self.state() == LifecycleState::Starting {
            self.transition(LifecycleState::Running);
        }
    }

    /// Mark the drain as finished, clean or forced.
    pub fn mark_stopped(&self) {
        self.transition(LifecycleState::Stopped);
    }

    fn transition(&self, next: LifecycleState) {
        let previous = self.state.swap(Arc::new(next));
        tracing::debug!(
            from = previous.as_str(),
            to = next.as_str(),
            "Lifecycle state changed"
        );
    }

    /// Track one in-flight request until the guard is dropped.
    pub fn in_flight_guard(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Decrements the in-flight count on drop, including during unwinding.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
