//! Auth provider trait and its payload types.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::events::auth::AuthEvent;
use crate::result::AppResult;

/// Email/password credentials for sign-up and sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A provider-side session as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// The authenticated identity's unique id.
    pub identity_id: Uuid,
    /// The identity's email.
    pub email: String,
    /// When the email was confirmed, if it has been.
    pub email_confirmed_at: Option<DateTime<Utc>>,
}

/// Outcome of a sign-up request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpOutcome {
    /// The newly created identity's id.
    pub identity_id: Uuid,
    /// The registered email.
    pub email: String,
    /// Whether the email was already confirmed at sign-up time.
    pub email_confirmed: bool,
}

/// Callback invoked for every provider-pushed auth lifecycle event.
pub type AuthEventHandler = Arc<dyn Fn(AuthEvent) + Send + Sync>;

/// Handle for a registered auth event handler.
///
/// Dropping the handle (or calling [`EventSubscription::unsubscribe`], which
/// is idempotent) stops further deliveries.
pub struct EventSubscription {
    canceller: Option<Box<dyn FnOnce() + Send>>,
}

impl EventSubscription {
    /// Wraps the cancel action for a registered handler.
    pub fn new(canceller: impl FnOnce() + Send + 'static) -> Self {
        Self {
            canceller: Some(Box::new(canceller)),
        }
    }

    /// Stops further event deliveries. Safe to call more than once.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.canceller.take() {
            cancel();
        }
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSubscription")
            .field("live", &self.canceller.is_some())
            .finish()
    }
}

/// Trait for the hosted authentication provider.
///
/// Errors carry the provider's message verbatim so explicit user actions
/// (login, register, password change) surface the real rejection reason.
#[async_trait]
pub trait AuthProvider: Send + Sync + fmt::Debug + 'static {
    /// Registers a new identity.
    async fn sign_up(&self, credentials: &Credentials) -> AppResult<SignUpOutcome>;

    /// Authenticates and establishes a session.
    async fn sign_in(&self, credentials: &Credentials) -> AppResult<AuthSession>;

    /// Ends the current session on the provider side.
    async fn sign_out(&self) -> AppResult<()>;

    /// Returns the provider's current session, if one is persisted.
    async fn current_session(&self) -> AppResult<Option<AuthSession>>;

    /// Changes the current identity's password.
    async fn update_password(&self, new_password: &str) -> AppResult<()>;

    /// Registers a handler for provider-pushed auth lifecycle events.
    fn on_auth_state_change(&self, handler: AuthEventHandler) -> EventSubscription;
}
