//! # plaza-auth
//!
//! The client-side session coordination layer:
//!
//! - [`SessionStore`] — process-wide session record with synchronous,
//!   registration-ordered observer fan-out and replay-on-subscribe
//! - [`InactivityMonitor`] — resettable idle-timeout forced logout over a
//!   single cancellable timer
//! - [`AuthEventBridge`] — reconciles provider-pushed auth lifecycle events
//!   into the store
//! - [`AccountManager`] — register/login/logout/restore/password workflows

pub mod account;
pub mod session;

#[cfg(test)]
pub(crate) mod testutil;

pub use account::AccountManager;
pub use session::bridge::AuthEventBridge;
pub use session::monitor::{InactivityMonitor, InteractionKind};
pub use session::store::{SessionObserver, SessionStore, SessionSubscription};
