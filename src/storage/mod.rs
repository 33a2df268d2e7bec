use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

pub mod http;
pub mod local;

pub use http::HttpStorage;
pub use local::LocalStorage;

/// A stored proof-of-payment asset. `asset_id` is what gets appended to the
/// payment's `proof_image` list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAsset {
    pub asset_id: String,
    pub url: String,
}

/// Destination for uploaded proof images. Uploads are fire-and-forget: no
/// retry or backoff, failures surface directly to the caller.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn store(&self, filename: &str, data: &[u8]) -> Result<StoredAsset>;
}

pub fn build_provider(config: &StorageConfig) -> Result<Arc<dyn StorageProvider>> {
    match config.provider.as_str() {
        "local" => Ok(Arc::new(LocalStorage::new(config.local_dir.clone()))),
        "http" => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                AppError::Internal("storage.endpoint is required for the http provider".to_string())
            })?;
            Ok(Arc::new(HttpStorage::new(
                endpoint,
                config.api_key.clone(),
                config.folder.clone(),
            )))
        }
        other => Err(AppError::Internal(format!(
            "Unknown storage provider: {}",
            other
        ))),
    }
}
