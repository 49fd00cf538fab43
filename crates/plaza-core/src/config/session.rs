//! Session and inactivity configuration.

use serde::{Deserialize, Serialize};

/// Session management configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minutes without a user-interaction signal before the client forces a
    /// logout.
    #[serde(default = "default_inactivity_timeout")]
    pub inactivity_timeout_minutes: u64,
    /// Days that must pass between password changes.
    #[serde(default = "default_password_change_interval")]
    pub password_change_interval_days: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: default_inactivity_timeout(),
            password_change_interval_days: default_password_change_interval(),
        }
    }
}

fn default_inactivity_timeout() -> u64 {
    30
}

fn default_password_change_interval() -> u64 {
    7
}
