//! # Plaza
//!
//! Client platform for a social-posting application built over a hosted
//! backend service. This facade crate wires the adapters, the session
//! coordination layer, the realtime bridge, and the domain services into a
//! single [`PlazaClient`].

pub mod client;
pub mod telemetry;

pub use client::PlazaClient;
pub use plaza_core::config::PlazaConfig;
pub use plaza_core::{AppError, AppResult};
pub use plaza_entity::session::{Session, SessionUpdate};
