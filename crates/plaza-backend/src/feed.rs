//! Websocket adapter for the change feeds.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use plaza_core::config::backend::BackendConfig;
use plaza_core::config::realtime::RealtimeConfig;
use plaza_core::error::AppError;
use plaza_core::events::change::{ChangeOp, RawChange};
use plaza_core::traits::changefeed::{ChangeFeed, ChangeHandler, FeedHandle};
use plaza_core::types::query::Filter;

/// Change-feed adapter over the backend's phoenix-style websocket.
///
/// Each subscription opens its own connection and joins one topic; releasing
/// the handle aborts the socket tasks, which closes the connection and stops
/// deliveries.
#[derive(Debug, Clone)]
pub struct WsChangeFeed {
    ws_url: String,
    heartbeat: Duration,
}

impl WsChangeFeed {
    /// Creates a change feed from the backend configuration.
    pub fn new(backend: &BackendConfig, realtime: &RealtimeConfig) -> Self {
        let ws_base = backend
            .url
            .trim_end_matches('/')
            .replacen("https://", "wss://", 1)
            .replacen("http://", "ws://", 1);
        Self {
            ws_url: format!(
                "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
                ws_base, backend.anon_key
            ),
            heartbeat: Duration::from_secs(realtime.heartbeat_interval_seconds),
        }
    }

    fn topic(table: &str, filter: &Option<Filter>) -> String {
        match filter {
            Some(f) => format!("realtime:public:{}:{}=eq.{}", table, f.column, f.value),
            None => format!("realtime:public:{table}"),
        }
    }
}

#[async_trait]
impl ChangeFeed for WsChangeFeed {
    async fn subscribe(
        &self,
        table: &str,
        filter: Option<Filter>,
        handler: ChangeHandler,
    ) -> Result<FeedHandle, AppError> {
        let (socket, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| AppError::with_source(
                plaza_core::error::ErrorKind::Network,
                format!("websocket connect failed: {e}"),
                e,
            ))?;
        let (sink, mut stream) = socket.split();
        let sink = Arc::new(Mutex::new(sink));

        let topic = Self::topic(table, &filter);
        let join = serde_json::json!({
            "topic": topic,
            "event": "phx_join",
            "payload": {},
            "ref": "1",
        });
        sink.lock()
            .await
            .send(Message::text(join.to_string()))
            .await
            .map_err(|e| AppError::network(format!("channel join failed: {e}")))?;
        info!(%topic, "Change-feed channel joined");

        // Keep the connection alive; the server drops silent clients.
        let heartbeat_sink = Arc::clone(&sink);
        let heartbeat_interval = self.heartbeat;
        let heartbeat_task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(heartbeat_interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                let beat = serde_json::json!({
                    "topic": "phoenix",
                    "event": "heartbeat",
                    "payload": {},
                    "ref": Value::Null,
                });
                if heartbeat_sink
                    .lock()
                    .await
                    .send(Message::text(beat.to_string()))
                    .await
                    .is_err()
                {
                    break;
                }
            }
        });

        let reader_table = table.to_string();
        let reader_task = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if let Some(change) = decode_change(&reader_table, text.as_str()) {
                            handler(change);
                        }
                    }
                    Ok(Message::Close(_)) => {
                        debug!(table = %reader_table, "Change-feed channel closed by server");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(table = %reader_table, error = %e, "Change-feed read error");
                        break;
                    }
                }
            }
        });

        Ok(FeedHandle::new(move || {
            reader_task.abort();
            heartbeat_task.abort();
        }))
    }
}

/// Decodes a websocket frame into a raw change, ignoring protocol frames
/// (join replies, heartbeats) and unknown events.
///
/// Tolerates both frame dialects: a bare `INSERT`/`UPDATE`/`DELETE` event
/// with the row data in `payload`, and a `postgres_changes` event nesting
/// it under `payload.data`.
fn decode_change(table: &str, text: &str) -> Option<RawChange> {
    let frame: Value = serde_json::from_str(text).ok()?;
    let event = frame.get("event")?.as_str()?;

    let data = match event {
        "INSERT" | "UPDATE" | "DELETE" => frame.get("payload")?.clone(),
        "postgres_changes" => frame.get("payload")?.get("data")?.clone(),
        _ => return None,
    };

    let op_name = match event {
        "postgres_changes" => data.get("type")?.as_str()?.to_string(),
        _ => event.to_string(),
    };
    let op = match op_name.as_str() {
        "INSERT" => ChangeOp::Insert,
        "UPDATE" => ChangeOp::Update,
        "DELETE" => ChangeOp::Delete,
        _ => return None,
    };

    let row = |keys: [&str; 2]| -> Option<Value> {
        keys.iter()
            .find_map(|k| data.get(*k))
            .cloned()
            .filter(|v| !v.is_null())
    };

    Some(RawChange {
        table: table.to_string(),
        op,
        new_row: row(["record", "new"]),
        old_row: row(["old_record", "old"]),
    })
}
