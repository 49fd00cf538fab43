//! Shared HTTP plumbing for the REST adapters.

use std::time::Duration;

use plaza_core::config::backend::BackendConfig;
use plaza_core::error::AppError;

/// Builds the shared HTTP client with the configured timeout.
pub(crate) fn build_client(config: &BackendConfig) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .build()
        .map_err(|e| AppError::with_source(plaza_core::error::ErrorKind::Configuration,
            format!("failed to build HTTP client: {e}"), e))
}

/// Maps a transport-level error to the unified error type.
pub(crate) fn transport_error(err: reqwest::Error) -> AppError {
    AppError::with_source(
        plaza_core::error::ErrorKind::Network,
        err.to_string(),
        err,
    )
}

/// Extracts the most useful human-readable message from an error body.
///
/// The backend is inconsistent about its error envelope (`message`, `msg`,
/// or `error_description` depending on the subsystem), so try each in turn.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(message) = value.get(key).and_then(|v| v.as_str()) {
                return message.to_string();
            }
        }
    }
    body.to_string()
}
