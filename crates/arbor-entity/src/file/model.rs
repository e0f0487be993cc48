//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// File metadata. The bytes live in the blob store under `storage_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: String,
    /// The containing folder (null for root-level files).
    pub folder_id: Option<Uuid>,
    /// The user-facing name, unique within its folder.
    pub name: String,
    /// Opaque reference into the blob store.
    pub storage_path: String,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// The folder to place the file in (None for root).
    #[serde(default)]
    pub folder_id: Option<Uuid>,
    /// The path assigned by the blob store.
    pub storage_path: String,
}

/// A rename, move, and/or content swap of an existing file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFile {
    /// New name; `None` keeps the current name.
    #[serde(default)]
    pub name: Option<String>,
    /// New folder; `None` keeps the current folder, `Some(None)` moves the
    /// file to the root.
    #[serde(
        default,
        deserialize_with = "crate::deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<Uuid>>,
    /// New blob location after the content was replaced.
    #[serde(default)]
    pub storage_path: Option<String>,
}

impl UpdateFile {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.folder_id.is_none() && self.storage_path.is_none()
    }
}
