//! Folder domain entities.

pub mod model;
pub mod tree;

pub use model::{CreateFolder, DeletedFolder, Folder, UpdateFolder};
pub use tree::{AnomalyReason, EntityKind, FilesystemTree, FolderNode, Nodes, TreeAnomaly};
