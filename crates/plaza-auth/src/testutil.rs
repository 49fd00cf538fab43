//! In-memory fakes shared by this crate's unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::events::auth::AuthEvent;
use plaza_core::traits::auth::{
    AuthEventHandler, AuthProvider, AuthSession, Credentials, EventSubscription, SignUpOutcome,
};
use plaza_entity::session::SessionUpdate;

use crate::session::store::{SessionObserver, SessionStore};

/// Scriptable in-memory auth provider.
#[derive(Default)]
pub(crate) struct FakeAuth {
    /// Number of sign-out calls observed.
    pub sign_out_calls: AtomicUsize,
    /// Session returned by `current_session`.
    pub persisted: Mutex<Option<AuthSession>>,
    next_handler_id: AtomicUsize,
    handlers: Arc<Mutex<Vec<(usize, AuthEventHandler)>>>,
}

impl FakeAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pushes an event to every registered handler.
    pub fn emit(&self, event: AuthEvent) {
        let handlers: Vec<AuthEventHandler> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in handlers {
            handler(event.clone());
        }
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for FakeAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeAuth")
            .field("sign_out_calls", &self.sign_outs())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthProvider for FakeAuth {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        Ok(SignUpOutcome {
            identity_id: Uuid::new_v4(),
            email: credentials.email.clone(),
            email_confirmed: false,
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AppError> {
        Ok(AuthSession {
            identity_id: Uuid::new_v4(),
            email: credentials.email.clone(),
            email_confirmed_at: Some(chrono::Utc::now()),
        })
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, AppError> {
        Ok(self.persisted.lock().unwrap().clone())
    }

    async fn update_password(&self, _new_password: &str) -> Result<(), AppError> {
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthEventHandler) -> EventSubscription {
        let id = self.next_handler_id.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().push((id, handler));
        let handlers = Arc::clone(&self.handlers);
        EventSubscription::new(move || {
            handlers.lock().unwrap().retain(|(hid, _)| *hid != id);
        })
    }
}

/// A recording observer plus the updates it has seen.
pub(crate) fn recording() -> (SessionObserver, Arc<Mutex<Vec<SessionUpdate>>>) {
    let log: Arc<Mutex<Vec<SessionUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    let observer: SessionObserver = Arc::new(move |update: &SessionUpdate| {
        log_clone.lock().unwrap().push(update.clone());
    });
    (observer, log)
}

/// Subscribes a recording observer, leaks its disposer, and discards the
/// replay entry so tests see only subsequent changes.
pub(crate) fn observe(store: &Arc<SessionStore>) -> Arc<Mutex<Vec<SessionUpdate>>> {
    let (observer, log) = recording();
    std::mem::forget(store.subscribe(observer));
    log.lock().unwrap().clear();
    log
}
