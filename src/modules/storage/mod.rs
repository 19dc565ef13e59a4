mod local;

pub use local::LocalStorage;

use async_trait::async_trait;

use crate::core::error::Result;

/// Storage backend trait for uploaded files.
///
/// The rest of the service only ever handles the opaque keys this trait
/// hands out; file content is never interpreted.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Save file data under a key
    async fn save(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Delete a file
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a file exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Public URL for a stored file
    fn url(&self, key: &str) -> String;
}
