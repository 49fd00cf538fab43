//! # plaza-core
//!
//! Core crate for Plaza. Contains the collaborator traits for the hosted
//! backend (auth provider, relational read/write path, change feeds, object
//! storage), configuration schemas, auth and change event types, query
//! building blocks, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Plaza crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
