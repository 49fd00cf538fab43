//! # plaza-backend
//!
//! Concrete adapters implementing the `plaza-core` collaborator traits
//! against a hosted PostgREST/GoTrue-style backend service:
//!
//! - [`RestTableClient`] — relational reads/writes over the REST surface
//! - [`RestAuthProvider`] — sign-up/sign-in/sign-out and the auth event
//!   stream
//! - [`WsChangeFeed`] — websocket change-feed channels
//! - [`RestObjectStore`] — object storage uploads and removals

pub mod auth;
pub mod feed;
pub mod rest;
pub mod storage;

mod http;

pub use auth::RestAuthProvider;
pub use feed::WsChangeFeed;
pub use rest::RestTableClient;
pub use storage::RestObjectStore;
