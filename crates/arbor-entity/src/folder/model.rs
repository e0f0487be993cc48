//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in a user's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// The owning user.
    pub user_id: String,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<Uuid>,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// A rename and/or move of an existing folder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFolder {
    /// New name; `None` keeps the current name.
    #[serde(default)]
    pub name: Option<String>,
    /// New parent; `None` keeps the current parent, `Some(None)` moves the
    /// folder to the root.
    #[serde(
        default,
        deserialize_with = "crate::deserialize_some",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<Uuid>>,
}

impl UpdateFolder {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

/// Outcome of a cascading folder delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedFolder {
    /// The folder that was deleted.
    pub folder: Folder,
    /// Number of folders removed, the deleted folder included.
    pub removed_folders: u64,
    /// Number of files removed directly or transitively.
    pub removed_files: u64,
    /// Storage paths of the removed files, for blob cleanup.
    pub storage_paths: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_distinguishes_absent_from_null_parent() {
        let keep: UpdateFolder = serde_json::from_str(r#"{"name":"Renamed"}"#).unwrap();
        assert_eq!(keep.parent_id, None);
        assert_eq!(keep.name.as_deref(), Some("Renamed"));

        let to_root: UpdateFolder = serde_json::from_str(r#"{"parent_id":null}"#).unwrap();
        assert_eq!(to_root.parent_id, Some(None));

        let id = Uuid::new_v4();
        let moved: UpdateFolder =
            serde_json::from_str(&format!(r#"{{"parent_id":"{id}"}}"#)).unwrap();
        assert_eq!(moved.parent_id, Some(Some(id)));
        assert!(!moved.is_empty());
        assert!(UpdateFolder::default().is_empty());
    }
}
