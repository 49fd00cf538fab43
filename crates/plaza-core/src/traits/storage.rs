//! Object storage trait for uploaded media.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for the backend's object storage surface.
#[async_trait]
pub trait ObjectStore: Send + Sync + fmt::Debug + 'static {
    /// Uploads an object and returns its stored path within the bucket.
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Removes objects by path.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;

    /// Returns the public URL for a stored path.
    fn public_url(&self, path: &str) -> String;
}
