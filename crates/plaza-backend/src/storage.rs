//! REST adapter for object storage.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;

use plaza_core::config::backend::BackendConfig;
use plaza_core::config::storage::StorageConfig;
use plaza_core::error::AppError;
use plaza_core::traits::storage::ObjectStore;

use crate::http::{build_client, error_message, transport_error};

/// Object storage over the backend's REST surface.
#[derive(Debug, Clone)]
pub struct RestObjectStore {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    bucket: String,
    cache_control_seconds: u64,
}

impl RestObjectStore {
    /// Creates an object store from the backend and storage configuration.
    pub fn new(backend: &BackendConfig, storage: &StorageConfig) -> Result<Self, AppError> {
        Ok(Self {
            http: build_client(backend)?,
            base_url: format!("{}/storage/v1", backend.url.trim_end_matches('/')),
            anon_key: backend.anon_key.clone(),
            bucket: storage.bucket.clone(),
            cache_control_seconds: storage.cache_control_seconds,
        })
    }
}

#[async_trait]
impl ObjectStore for RestObjectStore {
    async fn upload(&self, path: &str, data: Bytes, content_type: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!("{}/object/{}/{}", self.base_url, self.bucket, path))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Content-Type", content_type)
            .header(
                "Cache-Control",
                format!("max-age={}", self.cache_control_seconds),
            )
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::storage(error_message(&body)));
        }
        info!(%path, "Object uploaded");
        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), AppError> {
        let body = serde_json::json!({ "prefixes": paths });
        let response = self
            .http
            .delete(format!("{}/object/{}", self.base_url, self.bucket))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::storage(error_message(&body)));
        }
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, self.bucket, path)
    }
}
