//! Account workflows: register, login, logout, session restoration, and
//! password changes.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{error, info, warn};

use plaza_core::config::session::SessionConfig;
use plaza_core::error::AppError;
use plaza_core::traits::auth::{AuthProvider, Credentials, SignUpOutcome};
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Order, Select};
use plaza_entity::session::Session;
use plaza_service::profiles::ProfileService;

use crate::session::monitor::InactivityMonitor;
use crate::session::store::SessionStore;

/// Password-change history table name.
pub const PASSWORD_CHANGES_TABLE: &str = "password_changes";

/// Orchestrates explicit account operations against the auth provider,
/// keeping the session store and inactivity monitor in step.
///
/// Provider rejections on these explicit actions are surfaced typed, with
/// the provider's message preserved. Background reconciliation (the profile
/// upsert during registration, history recording after a password change) is
/// best-effort: failures are logged and never abort the primary operation.
#[derive(Debug)]
pub struct AccountManager {
    auth: Arc<dyn AuthProvider>,
    tables: Arc<dyn TableClient>,
    profiles: Arc<ProfileService>,
    store: Arc<SessionStore>,
    monitor: Arc<InactivityMonitor>,
    password_change_interval: ChronoDuration,
}

impl AccountManager {
    /// Creates an account manager.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        tables: Arc<dyn TableClient>,
        profiles: Arc<ProfileService>,
        store: Arc<SessionStore>,
        monitor: Arc<InactivityMonitor>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            auth,
            tables,
            profiles,
            store,
            monitor,
            password_change_interval: ChronoDuration::days(
                config.password_change_interval_days as i64,
            ),
        }
    }

    /// Registers a new account.
    ///
    /// The profile row is created best-effort — a failure there does not
    /// undo a successful registration. The session only becomes active (and
    /// fans out) when the provider reports the email as already confirmed;
    /// otherwise the user stays logged out until they confirm and sign in.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: Option<&str>,
    ) -> Result<SignUpOutcome, AppError> {
        let outcome = self
            .auth
            .sign_up(&Credentials::new(email, password))
            .await?;

        if let Err(e) = self
            .profiles
            .upsert(outcome.identity_id, &outcome.email, None, None, username)
            .await
        {
            warn!(
                identity_id = %outcome.identity_id,
                error = %e,
                "Profile creation failed, user is still registered"
            );
        }

        if outcome.email_confirmed {
            self.store.set_session(
                Session::authenticated(outcome.identity_id, outcome.email.clone()),
                false,
            );
        }

        info!(identity_id = %outcome.identity_id, "Registration completed");
        Ok(outcome)
    }

    /// Signs in, ensures the profile row exists, activates the session, and
    /// arms the inactivity monitor.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let auth_session = self
            .auth
            .sign_in(&Credentials::new(email, password))
            .await?;

        self.profiles
            .upsert(auth_session.identity_id, &auth_session.email, None, None, None)
            .await?;

        let session = Session::from(&auth_session);
        info!(identity_id = %auth_session.identity_id, "Login successful");
        self.store.set_session(session.clone(), false);
        self.monitor.arm();
        Ok(session)
    }

    /// Signs out: disarms the timer first, then ends the provider session
    /// and clears the local one.
    ///
    /// A provider failure is surfaced and leaves the local session in place
    /// (the timer stays disarmed; a retry or a pushed sign-out event will
    /// finish the job).
    pub async fn logout(&self) -> Result<(), AppError> {
        self.monitor.disarm();
        self.auth.sign_out().await?;
        info!("Logout successful");
        self.store.set_session(Session::anonymous(), false);
        Ok(())
    }

    /// Restores a persisted session at startup, arming the monitor when one
    /// exists. Errors are logged, never surfaced — a failed restoration
    /// just means starting logged out.
    pub async fn restore(&self) -> bool {
        match self.auth.current_session().await {
            Ok(Some(auth_session)) => {
                info!(identity_id = %auth_session.identity_id, "Session restored, arming inactivity monitor");
                self.store.set_session(Session::from(&auth_session), false);
                self.monitor.arm();
                true
            }
            Ok(None) => {
                info!("No persisted session");
                false
            }
            Err(e) => {
                error!(error = %e, "Session restoration failed");
                false
            }
        }
    }

    /// Changes the password, throttled to once per configured interval.
    pub async fn change_password(&self, new_password: &str) -> Result<(), AppError> {
        let identity_id = self
            .store
            .current()
            .identity_id
            .ok_or_else(|| AppError::authentication("Not signed in"))?;

        if let Some(last_change) = self.last_password_change(identity_id).await {
            let next_allowed = last_change + self.password_change_interval;
            if Utc::now() < next_allowed {
                return Err(AppError::rate_limit(format!(
                    "You must wait until {} to change your password again",
                    next_allowed.format("%Y-%m-%d")
                )));
            }
        }

        self.auth.update_password(new_password).await?;
        info!(identity_id = %identity_id, "Password changed");

        let row = serde_json::json!({
            "profile_id": identity_id,
            "changed_at": Utc::now(),
        });
        if let Err(e) = self.tables.insert(PASSWORD_CHANGES_TABLE, &row, None).await {
            warn!(error = %e, "Failed to record password change");
        }
        Ok(())
    }

    /// Most recent password change, if any. History read failures fail
    /// open — the change is allowed rather than blocked on a flaky read.
    async fn last_password_change(&self, identity_id: uuid::Uuid) -> Option<DateTime<Utc>> {
        let query = Select::new("changed_at")
            .filter("profile_id", identity_id)
            .order_by(Order::desc("changed_at"))
            .limit(1);
        match self.tables.select(PASSWORD_CHANGES_TABLE, &query).await {
            Ok(rows) => rows
                .first()
                .and_then(|row| row.get("changed_at"))
                .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok()),
            Err(e) => {
                warn!(error = %e, "Password-change history read failed, allowing change");
                None
            }
        }
    }
}
