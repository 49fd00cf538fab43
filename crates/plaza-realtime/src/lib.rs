//! # plaza-realtime
//!
//! Bridges the backend's row-change push feeds into typed application
//! callbacks. Raw change notifications carry no joins, so each insert or
//! update triggers a follow-up fetch against the canonical read path; the
//! fetched record decodes through the entity layer, which normalizes the
//! author sub-record's shape. Fetch failures degrade to the raw payload —
//! an event is never silently dropped.

pub mod bridge;
pub mod comments;
pub mod posts;
pub mod subscription;

pub use bridge::{ChangeBridge, DeleteCallback, FeedCallbacks, FeedRecord, RecordCallback};
pub use subscription::ChangeSubscription;
