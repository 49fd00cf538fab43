//! The change bridge: raw push events → enrichment fetch → typed callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use plaza_core::error::AppError;
use plaza_core::events::change::{ChangeOp, EntityKind, RawChange};
use plaza_core::traits::changefeed::{ChangeFeed, ChangeHandler};
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::{Filter, Select};

use crate::subscription::ChangeSubscription;

/// A record delivered by the bridge.
///
/// `Enriched` carries the canonical joined record from the follow-up fetch.
/// `Raw` is the degraded path: the fetch (or its decode) failed, so the
/// callback receives the push payload as delivered — without the normalized
/// author sub-record — rather than nothing at all.
#[derive(Debug, Clone)]
pub enum FeedRecord<T> {
    /// The fully joined, normalized record.
    Enriched(T),
    /// The raw push payload, delivered when enrichment failed.
    Raw(Value),
}

impl<T> FeedRecord<T> {
    /// The enriched record, if this delivery was not degraded.
    pub fn enriched(&self) -> Option<&T> {
        match self {
            Self::Enriched(record) => Some(record),
            Self::Raw(_) => None,
        }
    }

    /// Whether this delivery fell back to the raw payload.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

/// Callback for insert/update deliveries.
pub type RecordCallback<T> = Arc<dyn Fn(FeedRecord<T>) + Send + Sync>;

/// Callback for delete deliveries; receives only the deleted key.
pub type DeleteCallback = Arc<dyn Fn(Uuid) + Send + Sync>;

/// Per-operation callbacks for one subscription. Unset operations are
/// ignored.
pub struct FeedCallbacks<T> {
    /// Invoked once per insert.
    pub on_insert: Option<RecordCallback<T>>,
    /// Invoked once per update.
    pub on_update: Option<RecordCallback<T>>,
    /// Invoked once per delete, with the deleted row's key.
    pub on_delete: Option<DeleteCallback>,
}

impl<T> Default for FeedCallbacks<T> {
    fn default() -> Self {
        Self {
            on_insert: None,
            on_update: None,
            on_delete: None,
        }
    }
}

impl<T> FeedCallbacks<T> {
    /// No callbacks; combine with the builder methods below.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the insert callback.
    pub fn on_insert(mut self, callback: impl Fn(FeedRecord<T>) + Send + Sync + 'static) -> Self {
        self.on_insert = Some(Arc::new(callback));
        self
    }

    /// Sets the update callback.
    pub fn on_update(mut self, callback: impl Fn(FeedRecord<T>) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(callback));
        self
    }

    /// Sets the delete callback.
    pub fn on_delete(mut self, callback: impl Fn(Uuid) + Send + Sync + 'static) -> Self {
        self.on_delete = Some(Arc::new(callback));
        self
    }
}

/// Static description of one entity stream.
pub(crate) struct StreamSpec {
    /// Which stream this is, for logging.
    pub kind: EntityKind,
    /// Source table.
    pub table: &'static str,
    /// Primary key column.
    pub pk_column: &'static str,
    /// Canonical joined select clause used by enrichment fetches.
    pub select: &'static str,
    /// Optional scope filter (comments are scoped to a post).
    pub filter: Option<Filter>,
}

/// Bridges backend change feeds into typed callbacks.
///
/// Each insert/update event spawns its own enrichment fetch; two events for
/// the same key can therefore complete out of arrival order. That weak
/// per-key ordering is an accepted property of the bridge — events are
/// never reordered by the transport, but enrichment is not serialized.
#[derive(Debug, Clone)]
pub struct ChangeBridge {
    tables: Arc<dyn TableClient>,
    feed: Arc<dyn ChangeFeed>,
}

impl ChangeBridge {
    /// Creates a bridge over the given read path and change feed.
    pub fn new(tables: Arc<dyn TableClient>, feed: Arc<dyn ChangeFeed>) -> Self {
        Self { tables, feed }
    }

    pub(crate) async fn subscribe_stream<T>(
        &self,
        spec: StreamSpec,
        callbacks: FeedCallbacks<T>,
    ) -> Result<ChangeSubscription, AppError>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let callbacks = Arc::new(callbacks);
        let tables = Arc::clone(&self.tables);

        let kind = spec.kind;
        let table = spec.table;
        let pk_column = spec.pk_column;
        let select = spec.select;

        let handler_cancelled = Arc::clone(&cancelled);
        let handler: ChangeHandler = Arc::new(move |raw: RawChange| {
            if handler_cancelled.load(Ordering::SeqCst) {
                return;
            }
            dispatch(
                Arc::clone(&tables),
                kind,
                table,
                pk_column,
                select,
                Arc::clone(&callbacks),
                Arc::clone(&handler_cancelled),
                raw,
            );
        });

        let handle = self.feed.subscribe(table, spec.filter.clone(), handler).await?;
        info!(kind = ?kind, table = table, "Realtime subscription established");
        Ok(ChangeSubscription::new(handle, cancelled))
    }
}

/// Stage one of the pipeline: route by operation, kick off enrichment for
/// inserts and updates, deliver deletes immediately.
#[allow(clippy::too_many_arguments)]
fn dispatch<T>(
    tables: Arc<dyn TableClient>,
    kind: EntityKind,
    table: &'static str,
    pk_column: &'static str,
    select: &'static str,
    callbacks: Arc<FeedCallbacks<T>>,
    cancelled: Arc<AtomicBool>,
    raw: RawChange,
) where
    T: DeserializeOwned + Send + 'static,
{
    match raw.op {
        ChangeOp::Delete => {
            let Some(callback) = callbacks.on_delete.clone() else {
                return;
            };
            match raw.key(pk_column) {
                Some(key) => {
                    debug!(kind = ?kind, %key, "Delete event delivered");
                    callback(key);
                }
                None => warn!(kind = ?kind, "Delete event without a primary key"),
            }
        }
        ChangeOp::Insert | ChangeOp::Update => {
            let callback = match raw.op {
                ChangeOp::Insert => callbacks.on_insert.clone(),
                _ => callbacks.on_update.clone(),
            };
            let Some(callback) = callback else {
                return;
            };

            let Some(key) = raw.key(pk_column) else {
                // No key to fetch by; the raw payload is all there is.
                warn!(kind = ?kind, "Change event without a primary key, delivering raw payload");
                callback(FeedRecord::Raw(raw.new_row.unwrap_or(Value::Null)));
                return;
            };

            // Stage two: enrichment. Each event fetches independently; the
            // cancellation flag is re-checked at delivery so late results
            // after an unsubscribe are discarded, not delivered.
            tokio::spawn(async move {
                let query = Select::new(select).filter(pk_column, key);
                let fetched = tables.select_one(table, &query).await;

                if cancelled.load(Ordering::SeqCst) {
                    debug!(kind = ?kind, %key, "Subscription gone, discarding enrichment result");
                    return;
                }

                match fetched {
                    Ok(row) => match serde_json::from_value::<T>(row) {
                        Ok(record) => callback(FeedRecord::Enriched(record)),
                        Err(e) => {
                            warn!(kind = ?kind, %key, error = %e,
                                "Enriched row failed to decode, delivering raw payload");
                            callback(FeedRecord::Raw(raw.new_row.unwrap_or(Value::Null)));
                        }
                    },
                    Err(e) => {
                        warn!(kind = ?kind, %key, error = %e,
                            "Enrichment fetch failed, delivering raw payload");
                        callback(FeedRecord::Raw(raw.new_row.unwrap_or(Value::Null)));
                    }
                }
            });
        }
    }
}
