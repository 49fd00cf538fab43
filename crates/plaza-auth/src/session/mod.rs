//! Session lifecycle: state store, inactivity monitoring, and provider
//! event reconciliation.

pub mod bridge;
pub mod monitor;
pub mod store;

pub use bridge::AuthEventBridge;
pub use monitor::InactivityMonitor;
pub use store::SessionStore;
