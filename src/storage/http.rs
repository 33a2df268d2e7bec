use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::storage::{StorageProvider, StoredAsset};

/// Posts proof images to an external object store over HTTP multipart.
/// The provider's returned public id becomes the payment's asset id.
pub struct HttpStorage {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    folder: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "publicId")]
    public_id: Option<String>,
    #[serde(alias = "secureUrl", alias = "secure_url")]
    url: Option<String>,
}

impl HttpStorage {
    pub fn new(endpoint: String, api_key: Option<String>, folder: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            folder,
        }
    }
}

#[async_trait]
impl StorageProvider for HttpStorage {
    fn name(&self) -> &str {
        "http"
    }

    async fn store(&self, filename: &str, data: &[u8]) -> Result<StoredAsset> {
        let part = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(filename.to_string());

        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Storage(format!(
                "Upload failed with {}: {}",
                status, body
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let url = upload.url.clone().unwrap_or_default();
        let asset_id = upload
            .public_id
            .or(upload.url)
            .ok_or_else(|| AppError::Storage("Upload response carried no asset id".to_string()))?;

        Ok(StoredAsset { asset_id, url })
    }
}
