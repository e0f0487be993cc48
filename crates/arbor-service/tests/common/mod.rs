//! Shared fixtures: services wired to the in-memory store and blob store.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use arbor_auth::Principal;
use arbor_database::{HierarchyStore, MemoryStore, UserDirectory};
use arbor_service::{FileService, FolderService, IdentityRegistry, RequestContext, TreeService};
use arbor_storage::{MemoryStorageProvider, UrlSigner};

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub blobs: Arc<MemoryStorageProvider>,
    pub folders: FolderService,
    pub files: FileService,
    pub trees: TreeService,
    pub registry: IdentityRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let blobs = Arc::new(MemoryStorageProvider::new(UrlSigner::new(
            "http://blobs.test",
            "test-secret",
        )));
        let hierarchy: Arc<dyn HierarchyStore> = store.clone();
        let users: Arc<dyn UserDirectory> = store.clone();

        Self {
            folders: FolderService::new(hierarchy.clone(), blobs.clone()),
            files: FileService::new(hierarchy.clone(), blobs.clone(), Duration::from_secs(600)),
            trees: TreeService::new(hierarchy),
            registry: IdentityRegistry::new(users),
            store,
            blobs,
        }
    }

    /// Register a principal and return its request context.
    pub async fn login(&self, id: &str) -> RequestContext {
        let principal = Principal::new(id).with_email(format!("{id}@example.com"));
        self.registry.ensure_user(&principal).await.unwrap();
        RequestContext::new(principal)
    }
}
