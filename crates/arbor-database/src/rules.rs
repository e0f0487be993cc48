//! Hierarchy rules shared by both store implementations.

use std::collections::HashSet;

use uuid::Uuid;

use arbor_core::error::AppError;
use arbor_entity::file::File;
use arbor_entity::folder::Folder;

/// Error for a sibling name collision.
pub fn name_conflict(what: &str, name: &str) -> AppError {
    AppError::conflict(format!(
        "A {what} named '{name}' already exists in this location"
    ))
}

/// Error for a move that would make a folder its own ancestor.
pub fn cycle_error() -> AppError {
    AppError::cycle("Cannot move a folder into itself or one of its descendants")
}

/// Effective parent after applying an optional move.
///
/// `None` keeps `current`; `Some(target)` replaces it (`Some(None)` is root).
pub fn effective_parent(current: Option<Uuid>, requested: Option<Option<Uuid>>) -> Option<Uuid> {
    requested.unwrap_or(current)
}

/// Walk the parent chain upward from `start` and report whether `needle`
/// appears on it (`start` itself included).
///
/// `parent_of` returns `None` for an unknown folder and `Some(parent)` for a
/// known one. The walk stops at a root, at an unknown folder, or when it
/// revisits a folder, so corrupted chains terminate.
pub fn chain_contains<F>(start: Uuid, needle: Uuid, parent_of: F) -> bool
where
    F: Fn(Uuid) -> Option<Option<Uuid>>,
{
    let mut seen = HashSet::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if id == needle {
            return true;
        }
        if !seen.insert(id) {
            return false;
        }
        current = parent_of(id).flatten();
    }
    false
}

/// Listing order: by name, then by id for equal names.
pub fn sort_folders(folders: &mut [Folder]) {
    folders.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// Listing order: by name, then by id for equal names.
pub fn sort_files(files: &mut [File]) {
    files.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_effective_parent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(effective_parent(Some(a), None), Some(a));
        assert_eq!(effective_parent(Some(a), Some(None)), None);
        assert_eq!(effective_parent(None, Some(Some(b))), Some(b));
    }

    #[test]
    fn test_chain_contains_detects_descendant() {
        // root <- mid <- leaf
        let root = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let leaf = Uuid::new_v4();
        let parents: HashMap<Uuid, Option<Uuid>> =
            [(root, None), (mid, Some(root)), (leaf, Some(mid))].into();
        let lookup = |id: Uuid| parents.get(&id).copied();

        assert!(chain_contains(leaf, root, lookup));
        assert!(chain_contains(leaf, leaf, lookup));
        assert!(!chain_contains(root, leaf, lookup));
        assert!(!chain_contains(mid, leaf, lookup));
    }

    #[test]
    fn test_chain_contains_terminates_on_corrupt_loop() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let parents: HashMap<Uuid, Option<Uuid>> = [(a, Some(b)), (b, Some(a))].into();
        assert!(!chain_contains(a, outsider, |id| parents.get(&id).copied()));
    }
}
