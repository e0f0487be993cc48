//! Nested filesystem view assembled from flat rows.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::Folder;
use crate::file::File;

/// A folder with its directly contained subfolders and files.
///
/// Nesting depth is unbounded, so every walk over a node is iterative and
/// dropping a node never recurses.
#[derive(Debug, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder row.
    #[serde(flatten)]
    pub folder: Folder,
    /// Child folder nodes.
    pub subfolders: Vec<FolderNode>,
    /// Files directly inside this folder.
    pub files: Vec<File>,
}

impl FolderNode {
    /// Create a node with no children.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            subfolders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Every node in this subtree, this one first, in pre-order.
    pub fn iter(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    /// Number of folders in this subtree, including this one.
    pub fn folder_count(&self) -> u64 {
        self.iter().count() as u64
    }

    /// Number of files in this subtree.
    pub fn file_count(&self) -> u64 {
        self.iter().map(|node| node.files.len() as u64).sum()
    }

    /// Find a folder node by ID within this subtree.
    pub fn find(&self, id: Uuid) -> Option<&FolderNode> {
        self.iter().find(|node| node.folder.id == id)
    }
}

impl Drop for FolderNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.subfolders);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.subfolders);
        }
    }
}

/// Pre-order iterator over a [`FolderNode`] subtree.
#[derive(Debug)]
pub struct Nodes<'a> {
    stack: Vec<&'a FolderNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a FolderNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.subfolders.iter().rev());
        Some(node)
    }
}

/// Which kind of entity an anomaly refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A folder row.
    Folder,
    /// A file row.
    File,
}

/// Why an entity was left out of an assembled tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "related_id", rename_all = "snake_case")]
pub enum AnomalyReason {
    /// The referenced parent or containing folder is not in the loaded set.
    MissingParent(Uuid),
    /// The folder's ancestor chain loops without reaching a root.
    Cycle,
    /// The entity hangs below a folder that was itself excluded.
    ExcludedAncestor(Uuid),
    /// Another row with the same ID was already placed.
    Duplicate,
}

/// An entity excluded from a tree because stored data broke an invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeAnomaly {
    /// Folder or file.
    pub kind: EntityKind,
    /// The excluded entity's ID.
    pub id: Uuid,
    /// Why it was excluded.
    #[serde(flatten)]
    pub reason: AnomalyReason,
}

/// A user's complete hierarchy: root folders, root files, and anything that
/// could not be placed.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FilesystemTree {
    /// Root folders, each carrying its full subtree.
    pub folders: Vec<FolderNode>,
    /// Files with no containing folder.
    pub files: Vec<File>,
    /// Entities excluded because of integrity violations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub anomalies: Vec<TreeAnomaly>,
}

impl FilesystemTree {
    /// Whether every loaded entity was placed.
    pub fn is_consistent(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Total number of placed folders.
    pub fn total_folders(&self) -> u64 {
        self.folders.iter().map(FolderNode::folder_count).sum()
    }

    /// Total number of placed files.
    pub fn total_files(&self) -> u64 {
        let nested: u64 = self.folders.iter().map(FolderNode::file_count).sum();
        self.files.len() as u64 + nested
    }

    /// Find a placed folder node by ID.
    pub fn find_folder(&self, id: Uuid) -> Option<&FolderNode> {
        self.folders.iter().find_map(|root| root.find(id))
    }
}
