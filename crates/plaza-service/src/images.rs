//! Image upload, removal, and validation over object storage.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use plaza_core::config::storage::StorageConfig;
use plaza_core::error::AppError;
use plaza_core::traits::storage::ObjectStore;

/// Accepted image MIME types.
const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Service for user-uploaded images.
#[derive(Debug, Clone)]
pub struct ImageService {
    store: Arc<dyn ObjectStore>,
    config: StorageConfig,
}

impl ImageService {
    /// Creates a new image service.
    pub fn new(store: Arc<dyn ObjectStore>, config: StorageConfig) -> Self {
        Self { store, config }
    }

    /// Validates an upload's MIME type and size against the configured caps.
    pub fn validate(&self, content_type: &str, size_bytes: u64) -> Result<(), AppError> {
        if !ALLOWED_TYPES.contains(&content_type) {
            return Err(AppError::validation(
                "Unsupported image type. Use JPG, PNG, GIF or WebP.",
            ));
        }
        let max_bytes = self.config.max_upload_mb * 1024 * 1024;
        if size_bytes > max_bytes {
            return Err(AppError::validation(format!(
                "Image too large. Maximum {} MB.",
                self.config.max_upload_mb
            )));
        }
        Ok(())
    }

    /// Uploads an image under `<folder>/<profile_id>/` with a timestamped
    /// name and returns its public URL.
    pub async fn upload(
        &self,
        folder: &str,
        profile_id: Uuid,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, AppError> {
        self.validate(content_type, data.len() as u64)?;

        let extension = file_name.rsplit('.').next().unwrap_or("bin");
        let timestamp = Utc::now().timestamp_millis();
        let path = format!("{folder}/{profile_id}/{profile_id}_{timestamp}.{extension}");

        let stored = self.store.upload(&path, data, content_type).await?;
        let url = self.store.public_url(&stored);
        info!(path = %stored, "Image uploaded");
        Ok(url)
    }

    /// Removes an image given its public URL.
    ///
    /// URLs that do not point into the configured bucket are ignored.
    pub async fn remove_by_url(&self, url: &str) -> Result<(), AppError> {
        let Some(path) = object_path_from_url(url, &self.config.bucket) else {
            return Ok(());
        };
        self.store.remove(&[path.clone()]).await?;
        info!(path = %path, "Image removed");
        Ok(())
    }
}

/// Extracts the in-bucket object path from a public URL, or `None` when the
/// URL does not point into the given bucket.
pub fn object_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/storage/v1/object/public/{bucket}/");
    url.split_once(&marker).map(|(_, path)| path.to_string())
}
