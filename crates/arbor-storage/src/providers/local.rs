//! Local filesystem storage provider.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::traits::StorageProvider;
use arbor_core::traits::storage::SignedUrl;

use crate::paths::checked_segments;
use crate::signing::UrlSigner;

/// Stores blobs as files under a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
    signer: UrlSigner,
}

impl LocalStorageProvider {
    /// Create a provider rooted at `root_path`, creating the directory.
    pub async fn new(root_path: &str, signer: UrlSigner) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root, signer })
    }

    /// Resolve a storage path inside the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let mut full = self.root.clone();
        for segment in checked_segments(path)? {
            full.push(segment);
        }
        Ok(full)
    }

    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read blob: {path}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(path, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {path}"),
                e,
            )),
        }
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full_path = self.resolve(path)?;
        fs::try_exists(&full_path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat blob: {path}"), e)
        })
    }

    async fn signed_url(&self, path: &str, ttl: Duration) -> AppResult<SignedUrl> {
        self.resolve(path)?;
        self.signer.sign(path, ttl)
    }
}
