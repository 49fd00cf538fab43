//! REST adapter for the auth provider.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

use plaza_core::config::backend::BackendConfig;
use plaza_core::error::AppError;
use plaza_core::events::auth::AuthEvent;
use plaza_core::traits::auth::{
    AuthEventHandler, AuthProvider, AuthSession, Credentials, EventSubscription, SignUpOutcome,
};

use crate::http::{build_client, error_message, transport_error};

const EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone)]
struct ProviderState {
    session: AuthSession,
    access_token: String,
}

/// Auth provider over the backend's GoTrue-style REST surface.
///
/// The adapter holds the live session client-side and broadcasts lifecycle
/// events to registered handlers whenever the session changes.
#[derive(Debug)]
pub struct RestAuthProvider {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    state: Mutex<Option<ProviderState>>,
    events: broadcast::Sender<AuthEvent>,
}

impl RestAuthProvider {
    /// Creates an auth provider from the backend configuration.
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Ok(Self {
            http: build_client(config)?,
            base_url: format!("{}/auth/v1", config.url.trim_end_matches('/')),
            anon_key: config.anon_key.clone(),
            state: Mutex::new(None),
            events,
        })
    }

    fn access_token(&self) -> Option<String> {
        self.state
            .lock()
            .expect("auth state lock poisoned")
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn broadcast(&self, event: AuthEvent) {
        // No receivers is fine; events are best-effort fan-out.
        let _ = self.events.send(event);
    }

    async fn post(&self, path: &str, body: Value, bearer: Option<&str>) -> Result<Value, AppError> {
        let mut builder = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .json(&body);
        if let Some(token) = bearer {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(AppError::authentication(error_message(&body)));
        }
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(AppError::from)
    }
}

/// Pulls the identity fields out of a provider response, tolerating both
/// `{...user fields...}` and `{"user": {...}}` envelopes.
fn parse_identity(value: &Value) -> Result<(Uuid, String, Option<DateTime<Utc>>), AppError> {
    let user = value.get("user").unwrap_or(value);
    let id = user
        .get("id")
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::authentication("provider response carried no identity id"))?;
    let email = user
        .get("email")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let confirmed_at = user
        .get("email_confirmed_at")
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<DateTime<Utc>>().ok());
    Ok((id, email, confirmed_at))
}

#[async_trait]
impl AuthProvider for RestAuthProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let response = self.post("/signup", body, None).await?;
        let (identity_id, email, confirmed_at) = parse_identity(&response)?;
        info!(%identity_id, "Sign-up accepted");
        Ok(SignUpOutcome {
            identity_id,
            email,
            email_confirmed: confirmed_at.is_some(),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AppError> {
        let body = serde_json::json!({
            "email": credentials.email,
            "password": credentials.password,
        });
        let response = self
            .post("/token?grant_type=password", body, None)
            .await?;
        let access_token = response
            .get("access_token")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::authentication("provider response carried no access token"))?
            .to_string();
        let (identity_id, email, confirmed_at) = parse_identity(&response)?;

        let session = AuthSession {
            identity_id,
            email,
            email_confirmed_at: confirmed_at,
        };
        *self.state.lock().expect("auth state lock poisoned") = Some(ProviderState {
            session: session.clone(),
            access_token,
        });

        info!(%identity_id, "Signed in");
        self.broadcast(AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        if let Some(token) = self.access_token() {
            self.post("/logout", Value::Null, Some(&token)).await?;
        } else {
            debug!("Sign-out without a live provider session");
        }
        *self.state.lock().expect("auth state lock poisoned") = None;
        self.broadcast(AuthEvent::signed_out());
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthSession>, AppError> {
        Ok(self
            .state
            .lock()
            .expect("auth state lock poisoned")
            .as_ref()
            .map(|s| s.session.clone()))
    }

    async fn update_password(&self, new_password: &str) -> Result<(), AppError> {
        let token = self
            .access_token()
            .ok_or_else(|| AppError::authentication("Not signed in"))?;
        let body = serde_json::json!({ "password": new_password });
        let response = self
            .http
            .put(format!("{}/user", self.base_url))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::authentication(error_message(&body)));
        }
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthEventHandler) -> EventSubscription {
        let mut receiver = self.events.subscribe();
        let task = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => handler(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Auth event handler lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        EventSubscription::new(move || task.abort())
    }
}

impl RestAuthProvider {
    /// Injects a lifecycle event as if the backend had pushed it. Embedders
    /// that run their own refresh logic use this to surface
    /// `token_refreshed` outcomes to the session layer.
    pub fn push_event(&self, event: AuthEvent) {
        self.broadcast(event);
    }
}
