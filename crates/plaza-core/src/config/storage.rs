//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Object storage settings for user-uploaded images.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket holding uploaded images.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Maximum upload size in mebibytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_mb: u64,
    /// Cache-Control max-age (seconds) applied to uploads.
    #[serde(default = "default_cache_control")]
    pub cache_control_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            max_upload_mb: default_max_upload(),
            cache_control_seconds: default_cache_control(),
        }
    }
}

fn default_bucket() -> String {
    "images".to_string()
}

fn default_max_upload() -> u64 {
    5
}

fn default_cache_control() -> u64 {
    3600
}
