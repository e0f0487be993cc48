//! Store contracts shared by the PostgreSQL and in-memory implementations.
//!
//! Every hierarchy operation is scoped to an owner. Implementations must
//! apply the owner policy to the target row and to every row referenced
//! through `parent_id` / `folder_id`, and must run validation and write of
//! a mutation as one atomic unit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use arbor_core::result::AppResult;
use arbor_entity::ParentFilter;
use arbor_entity::file::{CreateFile, File, UpdateFile};
use arbor_entity::folder::{CreateFolder, DeletedFolder, Folder, UpdateFolder};
use arbor_entity::user::{NewUser, UpdateUser, User};

/// Every folder and file row of one owner, read at a single point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    /// All folders of the owner.
    pub folders: Vec<Folder>,
    /// All files of the owner.
    pub files: Vec<File>,
}

/// Outcome of an idempotent user registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsuredUser {
    /// The stored user record.
    pub user: User,
    /// Whether this call created the record.
    pub created: bool,
}

/// Owner-scoped folder and file operations.
#[async_trait]
pub trait HierarchyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a folder. `Conflict` on a sibling name clash, `NotFound` when
    /// the parent is missing or owned by someone else.
    async fn create_folder(&self, owner: &str, data: &CreateFolder) -> AppResult<Folder>;

    /// Fetch one folder.
    async fn get_folder(&self, owner: &str, id: Uuid) -> AppResult<Folder>;

    /// Rename and/or move a folder. `Cycle` when the target parent is the
    /// folder itself or one of its descendants.
    async fn update_folder(
        &self,
        owner: &str,
        id: Uuid,
        update: &UpdateFolder,
    ) -> AppResult<Folder>;

    /// Delete a folder with all descendant folders and contained files.
    async fn delete_folder(&self, owner: &str, id: Uuid) -> AppResult<DeletedFolder>;

    /// List folders whose parent matches `filter`.
    async fn list_folders(&self, owner: &str, filter: ParentFilter) -> AppResult<Vec<Folder>>;

    /// Create a file record.
    async fn create_file(&self, owner: &str, data: &CreateFile) -> AppResult<File>;

    /// Fetch one file.
    async fn get_file(&self, owner: &str, id: Uuid) -> AppResult<File>;

    /// Rename, move, and/or repoint a file.
    async fn update_file(&self, owner: &str, id: Uuid, update: &UpdateFile) -> AppResult<File>;

    /// Delete a file record and return it so its blob can be cleaned up.
    async fn delete_file(&self, owner: &str, id: Uuid) -> AppResult<File>;

    /// List files whose folder matches `filter`.
    async fn list_files(&self, owner: &str, filter: ParentFilter) -> AppResult<Vec<File>>;

    /// Load every folder and file of the owner consistently.
    async fn snapshot(&self, owner: &str) -> AppResult<HierarchySnapshot>;
}

/// Local mirror of identity-provider principals.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Insert the user if absent. An existing record is returned unchanged.
    async fn ensure_user(&self, data: &NewUser) -> AppResult<EnsuredUser>;

    /// Find a user by identifier.
    async fn find_user(&self, id: &str) -> AppResult<Option<User>>;

    /// Update mutable profile fields.
    async fn update_profile(&self, id: &str, update: &UpdateUser) -> AppResult<User>;
}
