//! [`HierarchyStore`] and [`UserDirectory`] on PostgreSQL.
//!
//! Each mutation runs in one transaction that first takes the owner's
//! advisory lock, so validation and write see the same hierarchy. The
//! unique and foreign-key constraints back every check up.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{PgConnection, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use arbor_auth::require_owned;
use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_entity::ParentFilter;
use arbor_entity::file::{CreateFile, File, UpdateFile};
use arbor_entity::folder::{CreateFolder, DeletedFolder, Folder, UpdateFolder};
use arbor_entity::user::{NewUser, UpdateUser, User};

use crate::connection::DatabasePool;
use crate::repositories::{self, file as file_repo, folder as folder_repo, user as user_repo};
use crate::rules;
use crate::store::{EnsuredUser, HierarchySnapshot, HierarchyStore, UserDirectory};

/// PostgreSQL-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an open pool.
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to acquire connection", e)
            })
    }

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
            })
    }

    /// Begin a transaction holding the owner's hierarchy lock.
    async fn begin_locked(&self, owner: &str) -> AppResult<Transaction<'static, Postgres>> {
        let mut tx = self.begin().await?;
        repositories::lock_owner(&mut tx, owner).await?;
        Ok(tx)
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> AppResult<()> {
    tx.commit().await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e)
    })
}

/// Load `id` and require that `owner` holds it.
async fn owned_folder(conn: &mut PgConnection, owner: &str, id: Uuid) -> AppResult<Folder> {
    let folder = folder_repo::find_by_id(conn, id).await?;
    require_owned(owner, folder, "Folder", id)
}

async fn owned_file(conn: &mut PgConnection, owner: &str, id: Uuid) -> AppResult<File> {
    let file = file_repo::find_by_id(conn, id).await?;
    require_owned(owner, file, "File", id)
}

#[async_trait]
impl HierarchyStore for PgStore {
    async fn create_folder(&self, owner: &str, data: &CreateFolder) -> AppResult<Folder> {
        let mut tx = self.begin_locked(owner).await?;

        if let Some(parent_id) = data.parent_id {
            owned_folder(&mut tx, owner, parent_id).await?;
        }
        if folder_repo::find_sibling(&mut tx, owner, data.parent_id, &data.name, None)
            .await?
            .is_some()
        {
            return Err(rules::name_conflict("folder", &data.name));
        }

        let folder =
            folder_repo::insert(&mut tx, Uuid::now_v7(), owner, data.parent_id, &data.name).await?;
        commit(tx).await?;

        debug!(folder_id = %folder.id, owner, name = %folder.name, "Folder created");
        Ok(folder)
    }

    async fn get_folder(&self, owner: &str, id: Uuid) -> AppResult<Folder> {
        let mut conn = self.acquire().await?;
        owned_folder(&mut conn, owner, id).await
    }

    async fn update_folder(
        &self,
        owner: &str,
        id: Uuid,
        update: &UpdateFolder,
    ) -> AppResult<Folder> {
        let mut tx = self.begin_locked(owner).await?;
        let current = owned_folder(&mut tx, owner, id).await?;

        let parent_id = rules::effective_parent(current.parent_id, update.parent_id);
        let name = update.name.clone().unwrap_or_else(|| current.name.clone());

        if let Some(target) = parent_id {
            owned_folder(&mut tx, owner, target).await?;
            if parent_id != current.parent_id {
                let ancestors = folder_repo::ancestor_ids(&mut tx, owner, target).await?;
                if ancestors.contains(&id) {
                    return Err(rules::cycle_error());
                }
            }
        }
        if folder_repo::find_sibling(&mut tx, owner, parent_id, &name, Some(id))
            .await?
            .is_some()
        {
            return Err(rules::name_conflict("folder", &name));
        }

        let folder = folder_repo::update(&mut tx, owner, id, parent_id, &name).await?;
        commit(tx).await?;

        debug!(folder_id = %id, owner, "Folder updated");
        Ok(folder)
    }

    async fn delete_folder(&self, owner: &str, id: Uuid) -> AppResult<DeletedFolder> {
        let mut tx = self.begin_locked(owner).await?;
        let folder = owned_folder(&mut tx, owner, id).await?;

        let subtree = folder_repo::subtree_ids(&mut tx, owner, id).await?;
        let storage_paths = file_repo::storage_paths_in(&mut tx, owner, &subtree).await?;

        if !folder_repo::delete(&mut tx, owner, id).await? {
            return Err(AppError::not_found("Folder not found"));
        }
        commit(tx).await?;

        let deleted = DeletedFolder {
            folder,
            removed_folders: subtree.len() as u64,
            removed_files: storage_paths.len() as u64,
            storage_paths,
        };
        info!(
            folder_id = %id,
            owner,
            removed_folders = deleted.removed_folders,
            removed_files = deleted.removed_files,
            "Folder deleted"
        );
        Ok(deleted)
    }

    async fn list_folders(&self, owner: &str, filter: ParentFilter) -> AppResult<Vec<Folder>> {
        let mut conn = self.acquire().await?;
        if let ParentFilter::In(parent_id) = filter {
            owned_folder(&mut conn, owner, parent_id).await?;
        }
        folder_repo::list(&mut conn, owner, filter).await
    }

    async fn create_file(&self, owner: &str, data: &CreateFile) -> AppResult<File> {
        let mut tx = self.begin_locked(owner).await?;

        if let Some(folder_id) = data.folder_id {
            owned_folder(&mut tx, owner, folder_id).await?;
        }
        if file_repo::find_sibling(&mut tx, owner, data.folder_id, &data.name, None)
            .await?
            .is_some()
        {
            return Err(rules::name_conflict("file", &data.name));
        }

        let file = file_repo::insert(
            &mut tx,
            Uuid::now_v7(),
            owner,
            data.folder_id,
            &data.name,
            &data.storage_path,
        )
        .await?;
        commit(tx).await?;

        debug!(file_id = %file.id, owner, name = %file.name, "File created");
        Ok(file)
    }

    async fn get_file(&self, owner: &str, id: Uuid) -> AppResult<File> {
        let mut conn = self.acquire().await?;
        owned_file(&mut conn, owner, id).await
    }

    async fn update_file(&self, owner: &str, id: Uuid, update: &UpdateFile) -> AppResult<File> {
        let mut tx = self.begin_locked(owner).await?;
        let current = owned_file(&mut tx, owner, id).await?;

        let folder_id = rules::effective_parent(current.folder_id, update.folder_id);
        let name = update.name.clone().unwrap_or_else(|| current.name.clone());
        let storage_path = update
            .storage_path
            .clone()
            .unwrap_or_else(|| current.storage_path.clone());

        if let Some(target) = folder_id {
            owned_folder(&mut tx, owner, target).await?;
        }
        if file_repo::find_sibling(&mut tx, owner, folder_id, &name, Some(id))
            .await?
            .is_some()
        {
            return Err(rules::name_conflict("file", &name));
        }

        let file = file_repo::update(&mut tx, owner, id, folder_id, &name, &storage_path).await?;
        commit(tx).await?;

        debug!(file_id = %id, owner, "File updated");
        Ok(file)
    }

    async fn delete_file(&self, owner: &str, id: Uuid) -> AppResult<File> {
        let mut tx = self.begin_locked(owner).await?;
        let file = owned_file(&mut tx, owner, id).await?;
        if !file_repo::delete(&mut tx, owner, id).await? {
            return Err(AppError::not_found("File not found"));
        }
        commit(tx).await?;

        debug!(file_id = %id, owner, "File deleted");
        Ok(file)
    }

    async fn list_files(&self, owner: &str, filter: ParentFilter) -> AppResult<Vec<File>> {
        let mut conn = self.acquire().await?;
        if let ParentFilter::In(folder_id) = filter {
            owned_folder(&mut conn, owner, folder_id).await?;
        }
        file_repo::list(&mut conn, owner, filter).await
    }

    async fn snapshot(&self, owner: &str) -> AppResult<HierarchySnapshot> {
        let mut tx = self.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set isolation level", e)
            })?;

        let folders = folder_repo::list(&mut tx, owner, ParentFilter::Any).await?;
        let files = file_repo::list(&mut tx, owner, ParentFilter::Any).await?;
        commit(tx).await?;

        Ok(HierarchySnapshot { folders, files })
    }
}

#[async_trait]
impl UserDirectory for PgStore {
    async fn ensure_user(&self, data: &NewUser) -> AppResult<EnsuredUser> {
        let mut tx = self.begin().await?;
        let result = match user_repo::insert_if_absent(&mut tx, data).await? {
            Some(user) => EnsuredUser {
                user,
                created: true,
            },
            None => {
                let user = user_repo::find_by_id(&mut tx, &data.id)
                    .await?
                    .ok_or_else(|| AppError::internal("User vanished during registration"))?;
                EnsuredUser {
                    user,
                    created: false,
                }
            }
        };
        commit(tx).await?;

        if result.created {
            info!(user_id = %result.user.id, "User registered");
        }
        Ok(result)
    }

    async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        let mut conn = self.acquire().await?;
        user_repo::find_by_id(&mut conn, id).await
    }

    async fn update_profile(&self, id: &str, update: &UpdateUser) -> AppResult<User> {
        let mut conn = self.acquire().await?;
        user_repo::update_profile(&mut conn, id, update)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
