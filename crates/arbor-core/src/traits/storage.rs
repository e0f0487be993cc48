//! Blob store boundary.
//!
//! The hierarchy core never interprets a storage path; it only hands paths
//! to a [`StorageProvider`] to write, read, sign, or delete bytes.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A time-limited retrieval link for a stored object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedUrl {
    /// The full URL including expiry and signature parameters.
    pub url: String,
    /// When the link stops being accepted.
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for blob storage backends.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes to the given path, replacing any existing object.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Read an object fully into memory.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Delete the object at the given path. Deleting a missing object succeeds.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Check whether an object exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Issue a retrieval link that stays valid for `ttl`.
    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl>;
}
