//! Authentication lifecycle events pushed by the auth provider.

use serde::{Deserialize, Serialize};

use crate::traits::auth::AuthSession;

/// Kind of auth lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEventKind {
    /// A session was established (login or restoration).
    SignedIn,
    /// The session ended.
    SignedOut,
    /// A token refresh completed. A missing session payload means the
    /// refresh failed and the client is effectively signed out.
    TokenRefreshed,
}

/// An auth lifecycle event with its optional session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// What happened.
    pub kind: AuthEventKind,
    /// The session after the event, if any.
    pub session: Option<AuthSession>,
}

impl AuthEvent {
    /// A signed-in event carrying the new session.
    pub fn signed_in(session: AuthSession) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            session: Some(session),
        }
    }

    /// A signed-out event.
    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            session: None,
        }
    }

    /// A token-refreshed event; `None` signals a failed refresh.
    pub fn token_refreshed(session: Option<AuthSession>) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            session,
        }
    }
}
