//! Realtime change-feed configuration.

use serde::{Deserialize, Serialize};

/// Realtime websocket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Heartbeat interval in seconds for the websocket transport.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// Buffer size for in-process event channels.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_seconds: default_heartbeat_interval(),
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    25
}

fn default_buffer_size() -> usize {
    256
}
