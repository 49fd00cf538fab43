//! Event types pushed by the hosted backend.
//!
//! Auth lifecycle events feed the session reconciliation layer; change
//! events feed the realtime bridge.

pub mod auth;
pub mod change;

pub use auth::{AuthEvent, AuthEventKind};
pub use change::{ChangeOp, EntityKind, RawChange};
