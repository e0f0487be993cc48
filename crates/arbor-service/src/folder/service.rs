//! Folder CRUD operations scoped to the requesting principal.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use arbor_core::error::AppError;
use arbor_core::traits::StorageProvider;
use arbor_database::HierarchyStore;
use arbor_entity::ParentFilter;
use arbor_entity::folder::{CreateFolder, DeletedFolder, Folder, UpdateFolder};
use arbor_entity::name::validate_name;

use crate::context::RequestContext;

/// Manages folder CRUD operations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Hierarchy store.
    store: Arc<dyn HierarchyStore>,
    /// Blob store, for cleaning up cascaded files.
    storage: Arc<dyn StorageProvider>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: Arc<dyn HierarchyStore>, storage: Arc<dyn StorageProvider>) -> Self {
        Self { store, storage }
    }

    /// Creates a folder at the root or under `parent_id`.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<Uuid>,
    ) -> Result<Folder, AppError> {
        let name = validate_name("Folder", name)?;
        let folder = self
            .store
            .create_folder(ctx.owner(), &CreateFolder { name, parent_id })
            .await?;

        info!(
            owner = ctx.owner(),
            folder_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );
        Ok(folder)
    }

    /// Gets a folder by ID.
    pub async fn get_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<Folder, AppError> {
        self.store.get_folder(ctx.owner(), folder_id).await
    }

    /// Renames and/or moves a folder.
    pub async fn rename_or_move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
        update: UpdateFolder,
    ) -> Result<Folder, AppError> {
        let name = update
            .name
            .as_deref()
            .map(|n| validate_name("Folder", n))
            .transpose()?;
        let update = UpdateFolder { name, ..update };

        let folder = self
            .store
            .update_folder(ctx.owner(), folder_id, &update)
            .await?;

        info!(
            owner = ctx.owner(),
            folder_id = %folder.id,
            name = %folder.name,
            parent_id = ?folder.parent_id,
            "Folder updated"
        );
        Ok(folder)
    }

    /// Deletes a folder with everything below it.
    ///
    /// Blobs of cascaded files are removed after the metadata is gone. A
    /// blob that fails to delete is logged and left behind.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: Uuid,
    ) -> Result<DeletedFolder, AppError> {
        let deleted = self.store.delete_folder(ctx.owner(), folder_id).await?;

        for path in &deleted.storage_paths {
            if let Err(e) = self.storage.delete(path).await {
                warn!(path = %path, error = %e, "Failed to delete blob of removed file");
            }
        }

        info!(
            owner = ctx.owner(),
            folder_id = %folder_id,
            removed_folders = deleted.removed_folders,
            removed_files = deleted.removed_files,
            "Folder deleted"
        );
        Ok(deleted)
    }

    /// Lists folders whose parent matches `filter`.
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        filter: ParentFilter,
    ) -> Result<Vec<Folder>, AppError> {
        self.store.list_folders(ctx.owner(), filter).await
    }
}
