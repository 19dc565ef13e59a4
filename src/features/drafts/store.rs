//! Cache contract backing the draft feature: string keys mapped to string
//! payloads, each with its own expiry. A write resets the TTL, a read never
//! extends it.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};

#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Upsert a value under a key with a fresh TTL
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Read a value if the key exists and has not expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn delete(&self, key: &str) -> Result<()>;
}

/// Postgres-backed expiring key-value store. Expired rows are invisible to
/// readers and reclaimed whenever a writer passes by.
pub struct PgDraftStore {
    pool: PgPool,
}

impl PgDraftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let expires_at = chrono::Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| AppError::Internal(format!("Invalid draft TTL: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO drafts (key, value, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(&value)
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save draft: {:?}", e);
            AppError::Database(e)
        })?;

        // Opportunistic cleanup of anything already expired
        if let Err(e) = sqlx::query("DELETE FROM drafts WHERE expires_at <= now()")
            .execute(&self.pool)
            .await
        {
            tracing::warn!("Failed to purge expired drafts: {:?}", e);
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar(
            r#"
            SELECT value
            FROM drafts
            WHERE key = $1 AND expires_at > now()
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load draft: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM drafts WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete draft: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(())
    }
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;
    use std::time::Instant;

    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryDraftStore {
        entries: Mutex<HashMap<String, (String, Instant)>>,
    }

    impl MemoryDraftStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl DraftStore for MemoryDraftStore {
        async fn put(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), (value, Instant::now() + ttl));
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<String>> {
            Ok(self
                .entries
                .lock()
                .await
                .get(key)
                .filter(|(_, expires_at)| *expires_at > Instant::now())
                .map(|(value, _)| value.clone()))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.entries.lock().await.remove(key);
            Ok(())
        }
    }
}
