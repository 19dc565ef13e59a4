use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    extension_for, is_mime_type_allowed, FileResponseDto, MAX_FILE_SIZE,
};
use crate::modules::storage::StorageBackend;

/// Service for storing uploaded evidence images
pub struct FileService {
    storage: Arc<dyn StorageBackend>,
}

impl FileService {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Validate and store an uploaded image, returning its opaque path
    pub async fn store_image(
        &self,
        content_type: &str,
        data: &[u8],
        uploader_id: i32,
    ) -> Result<FileResponseDto> {
        if !is_mime_type_allowed(content_type) {
            return Err(AppError::Validation(format!(
                "File type '{}' is not allowed; upload an image",
                content_type
            )));
        }

        if data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }

        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(format!(
                "File exceeds the {}MB limit",
                MAX_FILE_SIZE / (1024 * 1024)
            )));
        }

        let ext = extension_for(content_type)
            .ok_or_else(|| AppError::Validation("Unsupported image type".to_string()))?;
        let key = format!("uploads/{}.{}", Uuid::new_v4(), ext);

        self.storage.save(&key, data).await?;

        tracing::info!(
            "File stored: key={}, bytes={}, uploader={}",
            key,
            data.len(),
            uploader_id
        );

        Ok(FileResponseDto {
            url: self.storage.url(&key),
            path: key,
        })
    }
}
