//! Hosted backend endpoint configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hosted project (e.g. `https://xyz.example.co`).
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    pub anon_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Database schema queried through the relational read path.
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_schema() -> String {
    "public".to_string()
}
