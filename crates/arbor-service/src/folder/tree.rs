//! Whole-hierarchy reads.

use std::sync::Arc;

use tracing::{debug, error};

use arbor_core::error::AppError;
use arbor_database::HierarchyStore;
use arbor_entity::folder::FilesystemTree;

use super::assembler::{TreeAssembler, integrity_error};
use crate::context::RequestContext;

/// Loads a principal's rows and assembles the nested view.
#[derive(Debug, Clone)]
pub struct TreeService {
    store: Arc<dyn HierarchyStore>,
    assembler: TreeAssembler,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self {
            store,
            assembler: TreeAssembler::new(),
        }
    }

    /// Builds the principal's complete tree.
    ///
    /// Rows that cannot be placed are reported in `anomalies` and logged as
    /// a server-side fault; the rest of the tree is still returned.
    pub async fn get_tree(&self, ctx: &RequestContext) -> Result<FilesystemTree, AppError> {
        let snapshot = self.store.snapshot(ctx.owner()).await?;
        let tree = self.assembler.assemble(snapshot.folders, snapshot.files);

        if !tree.is_consistent() {
            let err = integrity_error(&tree.anomalies);
            error!(owner = ctx.owner(), error = %err, "Hierarchy integrity violation");
        }
        debug!(
            owner = ctx.owner(),
            folders = tree.total_folders(),
            files = tree.total_files(),
            "Assembled tree"
        );
        Ok(tree)
    }
}
