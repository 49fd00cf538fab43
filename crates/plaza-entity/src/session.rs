//! Client-local session record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use plaza_core::traits::auth::AuthSession;

/// The client-local record of the currently authenticated identity.
///
/// Exactly one `Session` exists per session store. An absent `identity_id`
/// means "not authenticated".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated identity's id, if any.
    pub identity_id: Option<Uuid>,
    /// The authenticated identity's email, if any.
    pub email: Option<String>,
}

impl Session {
    /// The unauthenticated session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for the given identity.
    pub fn authenticated(identity_id: Uuid, email: impl Into<String>) -> Self {
        Self {
            identity_id: Some(identity_id),
            email: Some(email.into()),
        }
    }

    /// Whether an identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.identity_id.is_some()
    }
}

impl From<&AuthSession> for Session {
    fn from(auth: &AuthSession) -> Self {
        Self::authenticated(auth.identity_id, auth.email.clone())
    }
}

/// The notification observers receive on every session change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUpdate {
    /// The session after the change.
    pub session: Session,
    /// Set only when the change was a forced logout caused by inactivity,
    /// so consumers can present it differently from a user-initiated logout.
    pub inactivity_logout: bool,
}
