//! File operations: metadata in the hierarchy store, bytes in the blob store.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use arbor_core::error::AppError;
use arbor_core::traits::StorageProvider;
use arbor_core::traits::storage::SignedUrl;
use arbor_database::HierarchyStore;
use arbor_entity::ParentFilter;
use arbor_entity::file::{CreateFile, File, UpdateFile};
use arbor_entity::name::validate_name;
use arbor_storage::paths::blob_path;

use crate::context::RequestContext;

/// Manages file uploads, downloads, and metadata.
#[derive(Debug, Clone)]
pub struct FileService {
    store: Arc<dyn HierarchyStore>,
    storage: Arc<dyn StorageProvider>,
    /// Lifetime of links from [`file_url`](Self::file_url) when none is given.
    default_url_ttl: Duration,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        store: Arc<dyn HierarchyStore>,
        storage: Arc<dyn StorageProvider>,
        default_url_ttl: Duration,
    ) -> Self {
        Self {
            store,
            storage,
            default_url_ttl,
        }
    }

    /// Stores `data` and records it as a new file.
    ///
    /// The blob is written first. If the record cannot be created the blob
    /// is removed again and the store's error is returned.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        name: &str,
        folder_id: Option<Uuid>,
        data: Bytes,
    ) -> Result<File, AppError> {
        let name = validate_name("File", name)?;
        let storage_path = blob_path(ctx.owner(), folder_id, &name);
        let size = data.len();

        self.storage.write(&storage_path, data).await?;

        let created = self
            .store
            .create_file(
                ctx.owner(),
                &CreateFile {
                    name,
                    folder_id,
                    storage_path: storage_path.clone(),
                },
            )
            .await;

        match created {
            Ok(file) => {
                info!(
                    owner = ctx.owner(),
                    file_id = %file.id,
                    name = %file.name,
                    bytes = size,
                    "File uploaded"
                );
                Ok(file)
            }
            Err(e) => {
                self.discard_blob(&storage_path).await;
                Err(e)
            }
        }
    }

    /// Gets a file's metadata.
    pub async fn get_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<File, AppError> {
        self.store.get_file(ctx.owner(), file_id).await
    }

    /// Gets a file's metadata and contents.
    pub async fn download_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
    ) -> Result<(File, Bytes), AppError> {
        let file = self.store.get_file(ctx.owner(), file_id).await?;
        let data = self.storage.read_bytes(&file.storage_path).await?;
        Ok((file, data))
    }

    /// Issues a time-limited retrieval link for a file's contents.
    pub async fn file_url(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        ttl: Option<Duration>,
    ) -> Result<SignedUrl, AppError> {
        let file = self.store.get_file(ctx.owner(), file_id).await?;
        self.storage
            .signed_url(&file.storage_path, ttl.unwrap_or(self.default_url_ttl))
            .await
    }

    /// Renames and/or moves a file. `folder_id` of `Some(None)` moves it to
    /// the root.
    pub async fn rename_or_move_file(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        name: Option<&str>,
        folder_id: Option<Option<Uuid>>,
    ) -> Result<File, AppError> {
        let name = name.map(|n| validate_name("File", n)).transpose()?;
        let file = self
            .store
            .update_file(
                ctx.owner(),
                file_id,
                &UpdateFile {
                    name,
                    folder_id,
                    storage_path: None,
                },
            )
            .await?;

        info!(
            owner = ctx.owner(),
            file_id = %file.id,
            name = %file.name,
            folder_id = ?file.folder_id,
            "File updated"
        );
        Ok(file)
    }

    /// Replaces a file's contents.
    ///
    /// New bytes go to a fresh path; the record is repointed and the old
    /// blob removed only after that succeeds.
    pub async fn replace_content(
        &self,
        ctx: &RequestContext,
        file_id: Uuid,
        data: Bytes,
    ) -> Result<File, AppError> {
        let current = self.store.get_file(ctx.owner(), file_id).await?;
        let new_path = blob_path(ctx.owner(), current.folder_id, &current.name);
        let size = data.len();

        self.storage.write(&new_path, data).await?;

        let update = UpdateFile {
            storage_path: Some(new_path.clone()),
            ..UpdateFile::default()
        };
        let file = match self.store.update_file(ctx.owner(), file_id, &update).await {
            Ok(file) => file,
            Err(e) => {
                self.discard_blob(&new_path).await;
                return Err(e);
            }
        };
        self.discard_blob(&current.storage_path).await;

        info!(
            owner = ctx.owner(),
            file_id = %file.id,
            bytes = size,
            "File content replaced"
        );
        Ok(file)
    }

    /// Deletes a file's record, then its blob.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: Uuid) -> Result<File, AppError> {
        let file = self.store.delete_file(ctx.owner(), file_id).await?;
        self.discard_blob(&file.storage_path).await;

        info!(owner = ctx.owner(), file_id = %file.id, "File deleted");
        Ok(file)
    }

    /// Lists files whose folder matches `filter`.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        filter: ParentFilter,
    ) -> Result<Vec<File>, AppError> {
        self.store.list_files(ctx.owner(), filter).await
    }

    async fn discard_blob(&self, path: &str) {
        if let Err(e) = self.storage.delete(path).await {
            warn!(path, error = %e, "Failed to delete blob");
        }
    }
}
