//! Reconciliation of provider-pushed auth lifecycle events.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use plaza_core::events::auth::{AuthEvent, AuthEventKind};
use plaza_core::traits::auth::{AuthProvider, EventSubscription};
use plaza_entity::session::Session;

use super::monitor::InactivityMonitor;
use super::store::SessionStore;

/// Bridges the auth provider's push events into the session store.
///
/// Events are applied as-is, tolerating duplicates and contradictions: a
/// repeated event re-applies the same session, which is a value-equal
/// set-session (and still fans out, by contract). A failed token refresh is
/// treated as a silent sign-out — the user simply becomes logged out on the
/// next check, with no error surfaced.
pub struct AuthEventBridge {
    store: Arc<SessionStore>,
    monitor: Arc<InactivityMonitor>,
    auth: Arc<dyn AuthProvider>,
    subscription: Mutex<Option<EventSubscription>>,
}

impl AuthEventBridge {
    /// Creates a bridge. Call [`AuthEventBridge::start`] to begin consuming
    /// events.
    pub fn new(
        store: Arc<SessionStore>,
        monitor: Arc<InactivityMonitor>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            store,
            monitor,
            auth,
            subscription: Mutex::new(None),
        }
    }

    /// Registers with the provider's event stream. Calling `start` again
    /// replaces the previous registration.
    pub fn start(&self) {
        let store = Arc::clone(&self.store);
        let monitor = Arc::clone(&self.monitor);
        let subscription = self.auth.on_auth_state_change(Arc::new(move |event| {
            apply(&store, &monitor, event);
        }));
        *self.subscription.lock().expect("subscription lock poisoned") = Some(subscription);
    }

    /// Stops consuming events. Idempotent.
    pub fn stop(&self) {
        if let Some(mut subscription) = self
            .subscription
            .lock()
            .expect("subscription lock poisoned")
            .take()
        {
            subscription.unsubscribe();
        }
    }
}

impl Drop for AuthEventBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

fn apply(store: &Arc<SessionStore>, monitor: &Arc<InactivityMonitor>, event: AuthEvent) {
    match event.kind {
        AuthEventKind::SignedIn => {
            if let Some(auth_session) = event.session {
                info!(identity_id = %auth_session.identity_id, "Signed in, arming inactivity monitor");
                store.set_session(Session::from(&auth_session), false);
                monitor.arm();
            } else {
                debug!("Signed-in event without a session payload, ignoring");
            }
        }
        AuthEventKind::SignedOut => {
            info!("Signed out, clearing session");
            monitor.disarm();
            store.set_session(Session::anonymous(), false);
        }
        AuthEventKind::TokenRefreshed => {
            if event.session.is_none() {
                // Refresh failure: same handling as a sign-out, silent.
                info!("Token refresh failed, clearing session");
                monitor.disarm();
                store.set_session(Session::anonymous(), false);
            } else {
                debug!("Token refreshed, session unchanged");
            }
        }
    }
}

impl std::fmt::Debug for AuthEventBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthEventBridge").finish_non_exhaustive()
    }
}
