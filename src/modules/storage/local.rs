use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::StorageBackend;

/// Local filesystem storage backend
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            base_path: PathBuf::from(&config.root_dir),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to create directory: {}", e)))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);

        if path.exists() {
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to delete file: {}", e)))?;
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key).exists())
    }

    fn url(&self, key: &str) -> String {
        format!("{}/files/{}", self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalStorage, PathBuf) {
        let dir = std::env::temp_dir().join(format!("kampuscare-test-{}", uuid::Uuid::new_v4()));
        let storage = LocalStorage::new(&StorageConfig {
            root_dir: dir.to_string_lossy().into_owned(),
            base_url: "http://localhost:3000/".to_string(),
        });
        (storage, dir)
    }

    #[tokio::test]
    async fn save_exists_delete_round_trip() {
        let (storage, dir) = temp_storage();

        storage.save("uploads/a.jpg", b"jpeg bytes").await.unwrap();
        assert!(storage.exists("uploads/a.jpg").await.unwrap());

        storage.delete("uploads/a.jpg").await.unwrap();
        assert!(!storage.exists("uploads/a.jpg").await.unwrap());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[tokio::test]
    async fn delete_of_missing_file_is_a_no_op() {
        let (storage, dir) = temp_storage();

        storage.delete("uploads/never-existed.jpg").await.unwrap();

        let _ = tokio::fs::remove_dir_all(dir).await;
    }

    #[test]
    fn url_strips_trailing_slash_from_base() {
        let storage = LocalStorage::new(&StorageConfig {
            root_dir: "/tmp/x".to_string(),
            base_url: "http://cdn.campus.test/".to_string(),
        });

        assert_eq!(
            storage.url("uploads/a.jpg"),
            "http://cdn.campus.test/files/uploads/a.jpg"
        );
    }
}
