//! Inactivity monitoring and forced logout.
//!
//! The monitor is a two-state machine, `Armed(deadline)` / `Disarmed`, over
//! a single cancellable timer. Arming replaces any previous timer (the
//! monitor is the only owner of a scheduled task, and at most one is live at
//! any instant); expiry walks the forced-logout path. Explicit logout and
//! provider sign-out events disarm through the same state machine, so the
//! two logout paths cannot race over the timer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use plaza_core::config::session::SessionConfig;
use plaza_core::traits::auth::AuthProvider;
use plaza_entity::session::Session;

use super::store::SessionStore;

/// Recognized user-interaction signals.
///
/// In a browser host these correspond to DOM events; elsewhere the embedder
/// forwards whatever it considers user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Pointer pressed.
    PointerDown,
    /// Pointer moved.
    PointerMove,
    /// Key pressed.
    KeyPress,
    /// Viewport scrolled.
    Scroll,
    /// Touch started.
    TouchStart,
    /// Element clicked.
    Click,
}

struct TimerSlot {
    /// Bumped on every transition; a sleeping task only acts if its epoch is
    /// still current, which makes replacement and expiry mutually exclusive.
    epoch: u64,
    deadline: Option<Instant>,
    task: Option<JoinHandle<()>>,
}

struct MonitorState {
    slot: Mutex<TimerSlot>,
    mounted: AtomicBool,
}

/// Watches user activity and forces a logout after an idle timeout.
pub struct InactivityMonitor {
    store: Arc<SessionStore>,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
    state: Arc<MonitorState>,
}

impl InactivityMonitor {
    /// Creates a monitor in the `Disarmed` state.
    pub fn new(
        store: Arc<SessionStore>,
        auth: Arc<dyn AuthProvider>,
        config: &SessionConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            auth,
            timeout: Duration::from_secs(config.inactivity_timeout_minutes * 60),
            state: Arc::new(MonitorState {
                slot: Mutex::new(TimerSlot {
                    epoch: 0,
                    deadline: None,
                    task: None,
                }),
                mounted: AtomicBool::new(false),
            }),
        })
    }

    /// The configured idle timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Starts accepting interaction signals (the host registered its
    /// interaction listeners).
    pub fn mount(&self) {
        self.state.mounted.store(true, Ordering::SeqCst);
    }

    /// Stops accepting interaction signals.
    pub fn unmount(&self) {
        self.state.mounted.store(false, Ordering::SeqCst);
    }

    /// Whether a timer is currently live.
    pub fn is_armed(&self) -> bool {
        self.state
            .slot
            .lock()
            .expect("timer lock poisoned")
            .task
            .is_some()
    }

    /// The live timer's deadline, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        self.state.slot.lock().expect("timer lock poisoned").deadline
    }

    /// Arms the timer, cancelling any previous one.
    ///
    /// Called on login and on session restoration; also the reset path for
    /// interaction signals (debounce-to-latest: only the most recent signal
    /// matters).
    pub fn arm(&self) {
        let mut slot = self.state.slot.lock().expect("timer lock poisoned");
        slot.epoch += 1;
        let epoch = slot.epoch;
        if let Some(task) = slot.task.take() {
            task.abort();
        }
        slot.deadline = Some(Instant::now() + self.timeout);

        let state = Arc::clone(&self.state);
        let store = Arc::clone(&self.store);
        let auth = Arc::clone(&self.auth);
        let timeout = self.timeout;
        slot.task = Some(tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            expire(state, store, auth, timeout, epoch).await;
        }));
        debug!(timeout_secs = self.timeout.as_secs(), "Inactivity timer armed");
    }

    /// Cancels the timer, transitioning to `Disarmed`.
    pub fn disarm(&self) {
        let mut slot = self.state.slot.lock().expect("timer lock poisoned");
        slot.epoch += 1;
        slot.deadline = None;
        if let Some(task) = slot.task.take() {
            task.abort();
            debug!("Inactivity timer cancelled");
        }
    }

    /// Feeds a user-interaction signal into the monitor.
    ///
    /// Signals are ignored while unmounted, while no session is active, and
    /// while disarmed; otherwise the timer re-arms with a fresh deadline.
    pub fn record_activity(&self, kind: InteractionKind) {
        if !self.state.mounted.load(Ordering::SeqCst) {
            return;
        }
        if !self.store.current().is_authenticated() {
            debug!(?kind, "Interaction ignored, no active session");
            return;
        }
        if !self.is_armed() {
            debug!(?kind, "Interaction ignored, monitor disarmed");
            return;
        }
        debug!(?kind, "Interaction detected, resetting inactivity timer");
        self.arm();
    }
}

/// Expiry path: runs when the timer fires and its epoch is still current.
/// Disarms, requests a backend sign-out (failure is logged, never
/// surfaced), clears the session, and fans out once with the inactivity
/// flag set.
async fn expire(
    state: Arc<MonitorState>,
    store: Arc<SessionStore>,
    auth: Arc<dyn AuthProvider>,
    timeout: Duration,
    epoch: u64,
) {
    {
        let mut slot = state.slot.lock().expect("timer lock poisoned");
        if slot.epoch != epoch {
            return;
        }
        slot.epoch += 1;
        slot.deadline = None;
        slot.task = None;
    }

    warn!(
        timeout_secs = timeout.as_secs(),
        "Session expired due to inactivity, forcing logout"
    );

    if let Err(e) = auth.sign_out().await {
        error!(error = %e, "Backend sign-out failed during inactivity logout");
    }

    store.set_session(Session::anonymous(), true);
}

impl std::fmt::Debug for InactivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InactivityMonitor")
            .field("timeout", &self.timeout)
            .field("armed", &self.is_armed())
            .finish()
    }
}
