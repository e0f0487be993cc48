//! In-memory storage provider.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::traits::StorageProvider;
use arbor_core::traits::storage::SignedUrl;

use crate::paths::checked_segments;
use crate::signing::UrlSigner;

/// Keeps blobs in a concurrent map. Contents vanish with the process.
#[derive(Debug)]
pub struct MemoryStorageProvider {
    objects: DashMap<String, Bytes>,
    signer: UrlSigner,
}

impl MemoryStorageProvider {
    pub fn new(signer: UrlSigner) -> Self {
        Self {
            objects: DashMap::new(),
            signer,
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn key(path: &str) -> AppResult<String> {
        Ok(checked_segments(path)?.join("/"))
    }
}

impl Default for MemoryStorageProvider {
    fn default() -> Self {
        Self::new(UrlSigner::new("memory://blobs", "memory"))
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.insert(Self::key(path)?, data);
        Ok(())
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        self.objects
            .get(&Self::key(path)?)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {path}")))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects.remove(&Self::key(path)?);
        Ok(())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(&Self::key(path)?))
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        self.signer.sign(&Self::key(path)?, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_delete() {
        let provider = MemoryStorageProvider::default();
        provider
            .write("u/root/1/a.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert!(provider.exists("/u/root/1/a.txt").await.unwrap());
        assert_eq!(
            provider.read_bytes("u/root/1/a.txt").await.unwrap(),
            Bytes::from_static(b"hello")
        );

        provider.delete("u/root/1/a.txt").await.unwrap();
        provider.delete("u/root/1/a.txt").await.unwrap();
        assert!(provider.is_empty());

        let err = provider.read_bytes("u/root/1/a.txt").await.unwrap_err();
        assert_eq!(err.kind, arbor_core::ErrorKind::NotFound);
    }
}
