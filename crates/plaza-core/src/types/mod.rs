//! Shared query-building types.

pub mod query;

pub use query::{Filter, Order, Select};
