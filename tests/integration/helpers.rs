//! Shared test helpers: in-memory backend fakes and client assembly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use plaza::{PlazaClient, PlazaConfig};
use plaza_auth::session::store::{SessionObserver, SessionStore};
use plaza_core::config::backend::BackendConfig;
use plaza_core::error::AppError;
use plaza_core::events::auth::AuthEvent;
use plaza_core::events::change::RawChange;
use plaza_core::traits::auth::{
    AuthEventHandler, AuthProvider, AuthSession, Credentials, EventSubscription, SignUpOutcome,
};
use plaza_core::traits::changefeed::{ChangeFeed, ChangeHandler, FeedHandle};
use plaza_core::traits::storage::ObjectStore;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Select};
use plaza_entity::session::SessionUpdate;

/// Assembled client plus handles to its backend fakes.
pub struct TestCtx {
    pub client: PlazaClient,
    pub auth: Arc<ScriptedAuth>,
    pub tables: Arc<MemoryTables>,
    pub feed: Arc<ManualFeed>,
}

/// Builds a client over fresh in-memory backends.
pub fn build() -> TestCtx {
    let auth = Arc::new(ScriptedAuth::default());
    let tables = Arc::new(MemoryTables::default());
    let feed = Arc::new(ManualFeed::default());

    let client = PlazaClient::with_backend(
        test_config(),
        auth.clone(),
        tables.clone(),
        feed.clone(),
        Arc::new(NullObjects),
    );

    TestCtx {
        client,
        auth,
        tables,
        feed,
    }
}

pub fn test_config() -> PlazaConfig {
    PlazaConfig {
        backend: BackendConfig {
            url: "https://project.example.co".into(),
            anon_key: "anon".into(),
            request_timeout_seconds: 5,
            schema: "public".into(),
        },
        session: Default::default(),
        realtime: Default::default(),
        storage: Default::default(),
        logging: Default::default(),
    }
}

/// Subscribes a recording observer, leaks the subscription, and discards
/// the replay entry so tests see only subsequent changes.
pub fn observe(store: &Arc<SessionStore>) -> Arc<Mutex<Vec<SessionUpdate>>> {
    let log: Arc<Mutex<Vec<SessionUpdate>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let observer: SessionObserver = Arc::new(move |update: &SessionUpdate| {
        sink.lock().unwrap().push(update.clone());
    });
    std::mem::forget(store.subscribe(observer));
    log.lock().unwrap().clear();
    log
}

/// Yields a few times so spawned pipeline tasks settle.
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// ── Scripted auth provider ──────────────────────────────────────────────

/// Auth provider fake with scriptable outcomes and hand-pushed events.
#[derive(Default)]
pub struct ScriptedAuth {
    identities: Mutex<HashMap<String, Uuid>>,
    /// Identity id handed to the next sign-up/sign-in.
    pub next_identity: Mutex<Option<Uuid>>,
    /// Whether sign-up reports the email as already confirmed.
    pub confirm_emails: AtomicBool,
    /// When set, sign-in is rejected with a provider-style message.
    pub reject_sign_in: AtomicBool,
    /// Session reported by `current_session`.
    pub persisted: Mutex<Option<AuthSession>>,
    sign_out_calls: AtomicUsize,
    next_handler: AtomicUsize,
    handlers: Arc<Mutex<Vec<(usize, AuthEventHandler)>>>,
}

impl ScriptedAuth {
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

    fn identity_for(&self, email: &str) -> Uuid {
        let mut identities = self.identities.lock().unwrap();
        if let Some(id) = identities.get(email) {
            return *id;
        }
        let id = self
            .next_identity
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(Uuid::new_v4);
        identities.insert(email.to_string(), id);
        id
    }
}

impl std::fmt::Debug for ScriptedAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedAuth")
            .field("sign_out_calls", &self.sign_outs())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuth {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AppError> {
        let identity_id = self.identity_for(&credentials.email);
        Ok(SignUpOutcome {
            identity_id,
            email: credentials.email.clone(),
            email_confirmed: self.confirm_emails.load(Ordering::SeqCst),
        })
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthSession, AppError> {
        if self.reject_sign_in.load(Ordering::SeqCst) {
            return Err(AppError::authentication("Invalid login credentials"));
        }
        Ok(AuthSession {
            identity_id: self.identity_for(&credentials.email),
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
        let id = self.next_handler.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().push((id, handler));
        let handlers = Arc::clone(&self.handlers);
        EventSubscription::new(move || {
            handlers.lock().unwrap().retain(|(hid, _)| *hid != id);
        })
    }
}

// ── In-memory table client ──────────────────────────────────────────────

/// Table client fake over per-table row vectors, honoring equality filters,
/// ordering, limits, and per-table unique keys.
#[derive(Debug, Default)]
pub struct MemoryTables {
    rows: Mutex<HashMap<String, Vec<Value>>>,
    /// When set, every read fails with a network error (for degraded-path
    /// tests).
    pub fail_selects: AtomicBool,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|f| {
        row.get(&f.column)
            .map(|v| value_text(v) == f.value)
            .unwrap_or(false)
    })
}

fn primary_key(table: &str) -> Option<&'static str> {
    match table {
        "posts" => Some("post_id"),
        "comments" => Some("comment_id"),
        "likes" => Some("like_id"),
        "reports" => Some("report_id"),
        "interests" => Some("interest_id"),
        _ => None,
    }
}

fn unique_keys(table: &str) -> Option<&'static [&'static str]> {
    match table {
        "profiles" => Some(&["profile_id"]),
        "likes" => Some(&["post_id", "profile_id"]),
        _ => None,
    }
}

impl MemoryTables {
    pub fn seed(&self, table: &str, row: Value) {
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn rows_in(&self, table: &str) -> Vec<Value> {
        self.rows
            .lock()
            .unwrap()
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    fn store_row(&self, table: &str, row: &Value) -> Result<Value, AppError> {
        let mut all = self.rows.lock().unwrap();
        let rows = all.entry(table.to_string()).or_default();

        if let Some(keys) = unique_keys(table) {
            let collides = rows
                .iter()
                .any(|existing| keys.iter().all(|k| existing.get(*k) == row.get(*k)));
            if collides {
                return Err(AppError::conflict(
                    "duplicate key value violates unique constraint",
                ));
            }
        }

        let mut stored = row.clone();
        if let Some(object) = stored.as_object_mut() {
            if let Some(pk) = primary_key(table) {
                object
                    .entry(pk)
                    .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            }
            object
                .entry("created_at")
                .or_insert_with(|| Value::String(chrono::Utc::now().to_rfc3339()));
        }
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl TableClient for MemoryTables {
    async fn select(&self, table: &str, query: &Select) -> Result<Vec<Value>, AppError> {
        if self.fail_selects.load(Ordering::SeqCst) {
            return Err(AppError::network("connection reset"));
        }
        let mut rows: Vec<Value> = self
            .rows_in(table)
            .into_iter()
            .filter(|row| matches(row, &query.filters))
            .collect();
        if let Some(order) = &query.order {
            rows.sort_by_key(|row| row.get(&order.column).map(value_text).unwrap_or_default());
            if !order.ascending {
                rows.reverse();
            }
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn select_one(&self, table: &str, query: &Select) -> Result<Value, AppError> {
        let mut rows = self.select(table, query).await?;
        if rows.is_empty() {
            return Err(AppError::not_found(format!("no matching row in {table}")));
        }
        Ok(rows.remove(0))
    }

    async fn select_maybe(&self, table: &str, query: &Select) -> Result<Option<Value>, AppError> {
        let mut rows = self.select(table, query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    async fn insert(
        &self,
        table: &str,
        row: &Value,
        _returning: Option<&str>,
    ) -> Result<Value, AppError> {
        self.store_row(table, row)
    }

    async fn insert_many(
        &self,
        table: &str,
        rows: &[Value],
        _returning: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            stored.push(self.store_row(table, row)?);
        }
        Ok(stored)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        patch: &Value,
        _returning: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut all = self.rows.lock().unwrap();
        let rows = all.entry(table.to_string()).or_default();
        let mut updated = None;
        for row in rows.iter_mut().filter(|row| matches(row, filters)) {
            if let (Some(object), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                for (key, value) in changes {
                    object.insert(key.clone(), value.clone());
                }
            }
            if updated.is_none() {
                updated = Some(row.clone());
            }
        }
        updated.ok_or_else(|| AppError::not_found(format!("no matching row in {table}")))
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), AppError> {
        let mut all = self.rows.lock().unwrap();
        if let Some(rows) = all.get_mut(table) {
            rows.retain(|row| !matches(row, filters));
        }
        Ok(())
    }
}

// ── Manual change feed ──────────────────────────────────────────────────

/// Change feed fake; tests push raw changes by hand.
#[derive(Default)]
pub struct ManualFeed {
    handlers: Mutex<Vec<ChangeHandler>>,
    pub released: Arc<AtomicBool>,
}

impl ManualFeed {
    pub fn emit(&self, change: RawChange) {
        let handlers = self.handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(change.clone());
        }
    }
}

impl std::fmt::Debug for ManualFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualFeed").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChangeFeed for ManualFeed {
    async fn subscribe(
        &self,
        _table: &str,
        _filter: Option<Filter>,
        handler: ChangeHandler,
    ) -> Result<FeedHandle, AppError> {
        self.handlers.lock().unwrap().push(handler);
        let released = Arc::clone(&self.released);
        Ok(FeedHandle::new(move || {
            released.store(true, Ordering::SeqCst);
        }))
    }
}

// ── Null object storage ─────────────────────────────────────────────────

/// Object store fake that accepts everything.
#[derive(Debug)]
pub struct NullObjects;

#[async_trait]
impl ObjectStore for NullObjects {
    async fn upload(
        &self,
        path: &str,
        _data: bytes::Bytes,
        _content_type: &str,
    ) -> Result<String, AppError> {
        Ok(path.to_string())
    }

    async fn remove(&self, _paths: &[String]) -> Result<(), AppError> {
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://project.example.co/storage/v1/object/public/images/{path}")
    }
}
