use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::storage::{StorageProvider, StoredAsset};

/// Allowed image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "pdf"];

/// Maximum file size (10 MB)
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Writes proof images to a directory on disk, served back under `/uploads`.
pub struct LocalStorage {
    dir: String,
}

impl LocalStorage {
    pub fn new(dir: String) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    fn name(&self) -> &str {
        "local"
    }

    async fn store(&self, filename: &str, data: &[u8]) -> Result<StoredAsset> {
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation("File too large (max 10 MB)".to_string()));
        }

        let extension = filename
            .rsplit('.')
            .next()
            .map(|s| s.to_lowercase())
            .ok_or_else(|| AppError::Validation("Invalid filename".to_string()))?;

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Invalid file type. Allowed: {}",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        let uploads_path = PathBuf::from(&self.dir);
        fs::create_dir_all(&uploads_path).await.map_err(|e| {
            AppError::Storage(format!("Failed to create uploads directory: {}", e))
        })?;

        let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
        let file_path = uploads_path.join(&new_filename);

        let mut file = fs::File::create(&file_path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to create file: {}", e)))?;

        file.write_all(data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file: {}", e)))?;

        // The relative path doubles as the asset id stored on the payment.
        let relative = format!("uploads/{}", new_filename);
        Ok(StoredAsset {
            asset_id: relative.clone(),
            url: format!("/{}", relative),
        })
    }
}
