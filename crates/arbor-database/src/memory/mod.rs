//! In-process [`HierarchyStore`] and [`UserDirectory`].
//!
//! Rows live in id-keyed maps behind one `RwLock`. A mutation holds the
//! write guard across validation and write, which gives the same atomicity
//! as a locked PostgreSQL transaction. The owner policy and the schema
//! constraints are checked explicitly on every call.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use arbor_auth::require_owned;
use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_entity::ParentFilter;
use arbor_entity::file::{CreateFile, File, UpdateFile};
use arbor_entity::folder::{CreateFolder, DeletedFolder, Folder, UpdateFolder};
use arbor_entity::user::{NewUser, UpdateUser, User};

use crate::rules;
use crate::store::{EnsuredUser, HierarchySnapshot, HierarchyStore, UserDirectory};

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, User>,
    folders: HashMap<Uuid, Folder>,
    files: HashMap<Uuid, File>,
}

impl State {
    fn require_user(&self, owner: &str) -> AppResult<()> {
        if self.users.contains_key(owner) {
            Ok(())
        } else {
            Err(AppError::not_found("User not found"))
        }
    }

    fn owned_folder(&self, owner: &str, id: Uuid) -> AppResult<&Folder> {
        require_owned(owner, self.folders.get(&id), "Folder", id)
    }

    fn owned_file(&self, owner: &str, id: Uuid) -> AppResult<&File> {
        require_owned(owner, self.files.get(&id), "File", id)
    }

    fn folder_name_taken(
        &self,
        owner: &str,
        parent_id: Option<Uuid>,
        name: &str,
        exclude: Option<Uuid>,
    ) -> bool {
        self.folders.values().any(|f| {
            f.user_id == owner
                && f.parent_id == parent_id
                && f.name == name
                && Some(f.id) != exclude
        })
    }

    fn file_name_taken(
        &self,
        owner: &str,
        folder_id: Option<Uuid>,
        name: &str,
        exclude: Option<Uuid>,
    ) -> bool {
        self.files.values().any(|f| {
            f.user_id == owner
                && f.folder_id == folder_id
                && f.name == name
                && Some(f.id) != exclude
        })
    }

    /// `root` and every folder below it, breadth first.
    fn subtree(&self, owner: &str, root: Uuid) -> Vec<Uuid> {
        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for folder in self.folders.values().filter(|f| f.user_id == owner) {
            if let Some(parent_id) = folder.parent_id {
                children.entry(parent_id).or_default().push(folder.id);
            }
        }

        let mut seen = HashSet::from([root]);
        let mut order = vec![root];
        let mut queue = VecDeque::from([root]);
        while let Some(id) = queue.pop_front() {
            for child in children.get(&id).into_iter().flatten() {
                if seen.insert(*child) {
                    order.push(*child);
                    queue.push_back(*child);
                }
            }
        }
        order
    }
}

/// Hierarchy store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a folder row as-is, skipping every check.
    ///
    /// Lets tests reproduce corrupted data the store would never accept.
    pub async fn insert_folder_unchecked(&self, folder: Folder) {
        self.state.write().await.folders.insert(folder.id, folder);
    }

    /// Insert a file row as-is, skipping every check.
    pub async fn insert_file_unchecked(&self, file: File) {
        self.state.write().await.files.insert(file.id, file);
    }
}

fn blank_name(what: &str, name: &str) -> AppError {
    AppError::validation(format!("Invalid {what} name '{name}'"))
}

#[async_trait]
impl HierarchyStore for MemoryStore {
    async fn create_folder(&self, owner: &str, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        state.require_user(owner)?;
        if data.name.trim().is_empty() {
            return Err(blank_name("folder", &data.name));
        }
        if let Some(parent_id) = data.parent_id {
            state.owned_folder(owner, parent_id)?;
        }
        if state.folder_name_taken(owner, data.parent_id, &data.name, None) {
            return Err(rules::name_conflict("folder", &data.name));
        }

        let now = Utc::now();
        let folder = Folder {
            id: Uuid::now_v7(),
            user_id: owner.to_string(),
            parent_id: data.parent_id,
            name: data.name.clone(),
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());

        debug!(folder_id = %folder.id, owner, name = %folder.name, "Folder created");
        Ok(folder)
    }

    async fn get_folder(&self, owner: &str, id: Uuid) -> AppResult<Folder> {
        let state = self.state.read().await;
        state.owned_folder(owner, id).cloned()
    }

    async fn update_folder(
        &self,
        owner: &str,
        id: Uuid,
        update: &UpdateFolder,
    ) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let current = state.owned_folder(owner, id)?.clone();

        let parent_id = rules::effective_parent(current.parent_id, update.parent_id);
        let name = update.name.clone().unwrap_or_else(|| current.name.clone());
        if name.trim().is_empty() {
            return Err(blank_name("folder", &name));
        }

        if let Some(target) = parent_id {
            state.owned_folder(owner, target)?;
            if parent_id != current.parent_id {
                let folders = &state.folders;
                let on_chain = rules::chain_contains(target, id, |fid| {
                    folders
                        .get(&fid)
                        .filter(|f| f.user_id == owner)
                        .map(|f| f.parent_id)
                });
                if on_chain {
                    return Err(rules::cycle_error());
                }
            }
        }
        if state.folder_name_taken(owner, parent_id, &name, Some(id)) {
            return Err(rules::name_conflict("folder", &name));
        }

        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        folder.parent_id = parent_id;
        folder.name = name;
        folder.updated_at = Utc::now();

        debug!(folder_id = %id, owner, "Folder updated");
        Ok(folder.clone())
    }

    async fn delete_folder(&self, owner: &str, id: Uuid) -> AppResult<DeletedFolder> {
        let mut state = self.state.write().await;
        let folder = state.owned_folder(owner, id)?.clone();

        let subtree = state.subtree(owner, id);
        let doomed: HashSet<Uuid> = subtree.iter().copied().collect();

        let mut storage_paths = Vec::new();
        state.files.retain(|_, file| {
            let contained = file.user_id == owner
                && file.folder_id.is_some_and(|fid| doomed.contains(&fid));
            if contained {
                storage_paths.push(file.storage_path.clone());
            }
            !contained
        });
        for folder_id in &subtree {
            state.folders.remove(folder_id);
        }

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
        let state = self.state.read().await;
        if let ParentFilter::In(parent_id) = filter {
            state.owned_folder(owner, parent_id)?;
        }
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.user_id == owner && filter.matches(f.parent_id))
            .cloned()
            .collect();
        rules::sort_folders(&mut folders);
        Ok(folders)
    }

    async fn create_file(&self, owner: &str, data: &CreateFile) -> AppResult<File> {
        let mut state = self.state.write().await;
        state.require_user(owner)?;
        if data.name.trim().is_empty() {
            return Err(blank_name("file", &data.name));
        }
        if let Some(folder_id) = data.folder_id {
            state.owned_folder(owner, folder_id)?;
        }
        if state.file_name_taken(owner, data.folder_id, &data.name, None) {
            return Err(rules::name_conflict("file", &data.name));
        }

        let now = Utc::now();
        let file = File {
            id: Uuid::now_v7(),
            user_id: owner.to_string(),
            folder_id: data.folder_id,
            name: data.name.clone(),
            storage_path: data.storage_path.clone(),
            created_at: now,
            updated_at: now,
        };
        state.files.insert(file.id, file.clone());

        debug!(file_id = %file.id, owner, name = %file.name, "File created");
        Ok(file)
    }

    async fn get_file(&self, owner: &str, id: Uuid) -> AppResult<File> {
        let state = self.state.read().await;
        state.owned_file(owner, id).cloned()
    }

    async fn update_file(&self, owner: &str, id: Uuid, update: &UpdateFile) -> AppResult<File> {
        let mut state = self.state.write().await;
        let current = state.owned_file(owner, id)?.clone();

        let folder_id = rules::effective_parent(current.folder_id, update.folder_id);
        let name = update.name.clone().unwrap_or_else(|| current.name.clone());
        if name.trim().is_empty() {
            return Err(blank_name("file", &name));
        }
        if let Some(target) = folder_id {
            state.owned_folder(owner, target)?;
        }
        if state.file_name_taken(owner, folder_id, &name, Some(id)) {
            return Err(rules::name_conflict("file", &name));
        }

        let file = state
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        file.folder_id = folder_id;
        file.name = name;
        if let Some(path) = &update.storage_path {
            file.storage_path = path.clone();
        }
        file.updated_at = Utc::now();

        debug!(file_id = %id, owner, "File updated");
        Ok(file.clone())
    }

    async fn delete_file(&self, owner: &str, id: Uuid) -> AppResult<File> {
        let mut state = self.state.write().await;
        state.owned_file(owner, id)?;
        let file = state
            .files
            .remove(&id)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        debug!(file_id = %id, owner, "File deleted");
        Ok(file)
    }

    async fn list_files(&self, owner: &str, filter: ParentFilter) -> AppResult<Vec<File>> {
        let state = self.state.read().await;
        if let ParentFilter::In(folder_id) = filter {
            state.owned_folder(owner, folder_id)?;
        }
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| f.user_id == owner && filter.matches(f.folder_id))
            .cloned()
            .collect();
        rules::sort_files(&mut files);
        Ok(files)
    }

    async fn snapshot(&self, owner: &str) -> AppResult<HierarchySnapshot> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.user_id == owner)
            .cloned()
            .collect();
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|f| f.user_id == owner)
            .cloned()
            .collect();
        rules::sort_folders(&mut folders);
        rules::sort_files(&mut files);
        Ok(HierarchySnapshot { folders, files })
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn ensure_user(&self, data: &NewUser) -> AppResult<EnsuredUser> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.users.get(&data.id) {
            return Ok(EnsuredUser {
                user: existing.clone(),
                created: false,
            });
        }

        let now = Utc::now();
        let user = User {
            id: data.id.clone(),
            email: data.email.clone(),
            full_name: data.full_name.clone(),
            avatar_url: data.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id.clone(), user.clone());

        info!(user_id = %user.id, "User registered");
        Ok(EnsuredUser {
            user,
            created: true,
        })
    }

    async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn update_profile(&self, id: &str, update: &UpdateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        if let Some(full_name) = &update.full_name {
            user.full_name = Some(full_name.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}
