//! Row-change events delivered by the backend change feeds.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entity stream a change belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The posts stream.
    Post,
    /// The comments stream (scoped to a post).
    Comment,
}

/// Operation kind carried by a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

/// A raw change notification as delivered by the transport.
///
/// Ephemeral — constructed per push notification, never persisted. The raw
/// payload is not guaranteed to contain denormalized joins; consumers that
/// need the full record perform a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChange {
    /// Source table name.
    pub table: String,
    /// Operation kind.
    pub op: ChangeOp,
    /// The row after the change (insert/update).
    pub new_row: Option<serde_json::Value>,
    /// The row before the change (update/delete; often key-only).
    pub old_row: Option<serde_json::Value>,
}

impl RawChange {
    /// Extracts the primary key from whichever row payload carries it.
    pub fn key(&self, pk_column: &str) -> Option<Uuid> {
        let from = |row: &Option<serde_json::Value>| {
            row.as_ref()
                .and_then(|r| r.get(pk_column))
                .and_then(|v| v.as_str())
                .and_then(|s| Uuid::parse_str(s).ok())
        };
        match self.op {
            ChangeOp::Delete => from(&self.old_row).or_else(|| from(&self.new_row)),
            _ => from(&self.new_row).or_else(|| from(&self.old_row)),
        }
    }
}
