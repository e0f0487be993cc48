//! Flat rows to nested tree.
//!
//! The assembler never trusts the rows it is given. Every folder is
//! classified by walking its parent chain once (memoised), so a dangling
//! parent or a parent loop is detected in O(n) overall and reported
//! instead of looping or being re-homed at the root.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use arbor_core::error::AppError;
use arbor_entity::file::File;
use arbor_entity::folder::{
    AnomalyReason, EntityKind, FilesystemTree, Folder, FolderNode, TreeAnomaly,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Unvisited,
    /// On the chain currently being walked.
    Visiting,
    /// Reaches a root through linked folders.
    Linked,
    Excluded(AnomalyReason),
}

/// Builds a [`FilesystemTree`] from one owner's folder and file rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeAssembler;

impl TreeAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble the tree. Entities that cannot be placed are left out of
    /// the tree and listed in [`FilesystemTree::anomalies`].
    pub fn assemble(&self, folders: Vec<Folder>, files: Vec<File>) -> FilesystemTree {
        let mut anomalies = Vec::new();
        let mut index: HashMap<Uuid, usize> = HashMap::with_capacity(folders.len());
        let mut rows: Vec<Folder> = Vec::with_capacity(folders.len());
        for folder in folders {
            if index.contains_key(&folder.id) {
                anomalies.push(duplicate(EntityKind::Folder, folder.id));
                continue;
            }
            index.insert(folder.id, rows.len());
            rows.push(folder);
        }

        let status = classify(&rows, &index);

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
        let mut roots = Vec::new();
        for (i, folder) in rows.iter().enumerate() {
            match status[i] {
                Status::Linked => match folder.parent_id.and_then(|p| index.get(&p)) {
                    Some(&parent) => children[parent].push(i),
                    None => roots.push(i),
                },
                Status::Excluded(reason) => anomalies.push(TreeAnomaly {
                    kind: EntityKind::Folder,
                    id: folder.id,
                    reason,
                }),
                Status::Unvisited | Status::Visiting => {}
            }
        }

        let mut contents: Vec<Vec<File>> = vec![Vec::new(); rows.len()];
        let mut root_files = Vec::new();
        let mut seen_files = HashSet::with_capacity(files.len());
        for file in files {
            if !seen_files.insert(file.id) {
                anomalies.push(duplicate(EntityKind::File, file.id));
                continue;
            }
            let Some(folder_id) = file.folder_id else {
                root_files.push(file);
                continue;
            };
            match index.get(&folder_id) {
                Some(&i) if status[i] == Status::Linked => contents[i].push(file),
                Some(_) => anomalies.push(TreeAnomaly {
                    kind: EntityKind::File,
                    id: file.id,
                    reason: AnomalyReason::ExcludedAncestor(folder_id),
                }),
                None => anomalies.push(TreeAnomaly {
                    kind: EntityKind::File,
                    id: file.id,
                    reason: AnomalyReason::MissingParent(folder_id),
                }),
            }
        }

        let by_name = |a: &usize, b: &usize| {
            rows[*a]
                .name
                .cmp(&rows[*b].name)
                .then(rows[*a].id.cmp(&rows[*b].id))
        };
        roots.sort_by(by_name);
        for list in &mut children {
            list.sort_by(by_name);
        }
        for list in &mut contents {
            sort_files(list);
        }
        sort_files(&mut root_files);

        // Pre-order from the roots; building in reverse guarantees every
        // child node exists before its parent takes it.
        let mut order = Vec::with_capacity(rows.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            order.push(i);
            stack.extend(children[i].iter().rev().copied());
        }

        let mut nodes: Vec<Option<FolderNode>> = (0..rows.len()).map(|_| None).collect();
        for &i in order.iter().rev() {
            let subfolders = children[i]
                .iter()
                .filter_map(|&c| nodes[c].take())
                .collect();
            nodes[i] = Some(FolderNode {
                folder: rows[i].clone(),
                subfolders,
                files: std::mem::take(&mut contents[i]),
            });
        }

        FilesystemTree {
            folders: roots.iter().filter_map(|&i| nodes[i].take()).collect(),
            files: root_files,
            anomalies,
        }
    }
}

/// Resolve every folder to linked or excluded.
fn classify(rows: &[Folder], index: &HashMap<Uuid, usize>) -> Vec<Status> {
    let mut status = vec![Status::Unvisited; rows.len()];

    for start in 0..rows.len() {
        if status[start] != Status::Unvisited {
            continue;
        }

        let mut chain = Vec::new();
        let mut current = start;
        // What the top of the chain resolves to.
        let outcome = loop {
            match status[current] {
                Status::Linked => break Status::Linked,
                Status::Excluded(reason) => {
                    break Status::Excluded(AnomalyReason::ExcludedAncestor(root_cause(
                        reason,
                        rows[current].id,
                    )));
                }
                Status::Visiting => {
                    // `current` closed a loop: everything from its first
                    // appearance onward is on the cycle.
                    let loop_start = chain.iter().position(|&i| i == current).unwrap_or(0);
                    for &i in &chain[loop_start..] {
                        status[i] = Status::Excluded(AnomalyReason::Cycle);
                    }
                    chain.truncate(loop_start);
                    break Status::Excluded(AnomalyReason::ExcludedAncestor(rows[current].id));
                }
                Status::Unvisited => {}
            }

            status[current] = Status::Visiting;
            chain.push(current);
            match rows[current].parent_id {
                None => break Status::Linked,
                Some(parent_id) => match index.get(&parent_id) {
                    Some(&parent) => current = parent,
                    None => {
                        chain.pop();
                        status[current] =
                            Status::Excluded(AnomalyReason::MissingParent(parent_id));
                        break Status::Excluded(AnomalyReason::ExcludedAncestor(
                            rows[current].id,
                        ));
                    }
                },
            }
        };

        for i in chain {
            status[i] = outcome;
        }
    }

    status
}

/// The excluded folder that descendants should point at.
fn root_cause(reason: AnomalyReason, id: Uuid) -> Uuid {
    match reason {
        AnomalyReason::ExcludedAncestor(cause) => cause,
        AnomalyReason::MissingParent(_) | AnomalyReason::Cycle | AnomalyReason::Duplicate => id,
    }
}

fn duplicate(kind: EntityKind, id: Uuid) -> TreeAnomaly {
    TreeAnomaly {
        kind,
        id,
        reason: AnomalyReason::Duplicate,
    }
}

fn sort_files(files: &mut [File]) {
    files.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
}

/// Server-side error describing excluded entities.
pub fn integrity_error(anomalies: &[TreeAnomaly]) -> AppError {
    let ids: Vec<String> = anomalies.iter().map(|a| a.id.to_string()).collect();
    AppError::integrity(format!(
        "{} entities excluded from tree: {}",
        anomalies.len(),
        ids.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn folder(name: &str, parent_id: Option<Uuid>) -> Folder {
        Folder {
            id: Uuid::now_v7(),
            user_id: "alice".to_string(),
            parent_id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn file(name: &str, folder_id: Option<Uuid>) -> File {
        File {
            id: Uuid::now_v7(),
            user_id: "alice".to_string(),
            folder_id,
            name: name.to_string(),
            storage_path: format!("alice/{name}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_docs_example() {
        let docs = folder("Docs", None);
        let year = folder("2024", Some(docs.id));
        let a = file("a.tex", Some(year.id));
        let b = file("b.tex", None);

        let tree = TreeAssembler::new().assemble(
            vec![year.clone(), docs.clone()],
            vec![a.clone(), b.clone()],
        );

        assert!(tree.is_consistent());
        assert_eq!(tree.folders.len(), 1);
        let root = &tree.folders[0];
        assert_eq!(root.folder.id, docs.id);
        assert!(root.files.is_empty());
        assert_eq!(root.subfolders.len(), 1);
        assert_eq!(root.subfolders[0].folder.id, year.id);
        assert_eq!(root.subfolders[0].files, vec![a]);
        assert_eq!(tree.files, vec![b]);
        assert_eq!(tree.total_folders(), 2);
        assert_eq!(tree.total_files(), 2);
    }

    #[test]
    fn test_empty_input() {
        let tree = TreeAssembler::new().assemble(Vec::new(), Vec::new());
        assert!(tree.folders.is_empty());
        assert!(tree.files.is_empty());
        assert!(tree.is_consistent());
    }

    #[test]
    fn test_siblings_sorted_by_name() {
        let root = folder("root", None);
        let z = folder("zeta", Some(root.id));
        let a = folder("alpha", Some(root.id));
        let m = folder("mu", Some(root.id));

        let tree = TreeAssembler::new().assemble(vec![z, root.clone(), m, a], Vec::new());
        let names: Vec<_> = tree.folders[0]
            .subfolders
            .iter()
            .map(|n| n.folder.name.as_str())
            .collect();
        assert_eq!(names, ["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_dangling_parent_is_excluded_not_rehomed() {
        let ghost = Uuid::now_v7();
        let orphan = folder("Orphan", Some(ghost));
        let below = folder("Below", Some(orphan.id));
        let inside = file("inside.txt", Some(below.id));
        let lost = file("lost.txt", Some(ghost));
        let fine = folder("Fine", None);

        let tree = TreeAssembler::new().assemble(
            vec![orphan.clone(), below.clone(), fine.clone()],
            vec![inside.clone(), lost.clone()],
        );

        assert_eq!(tree.folders.len(), 1);
        assert_eq!(tree.folders[0].folder.id, fine.id);
        assert!(tree.files.is_empty());
        assert!(tree.find_folder(orphan.id).is_none());

        let reasons: HashMap<Uuid, AnomalyReason> =
            tree.anomalies.iter().map(|a| (a.id, a.reason)).collect();
        assert_eq!(reasons[&orphan.id], AnomalyReason::MissingParent(ghost));
        assert_eq!(reasons[&below.id], AnomalyReason::ExcludedAncestor(orphan.id));
        assert_eq!(reasons[&inside.id], AnomalyReason::ExcludedAncestor(below.id));
        assert_eq!(reasons[&lost.id], AnomalyReason::MissingParent(ghost));
    }

    #[test]
    fn test_cycle_is_reported_and_terminates() {
        let mut a = folder("A", None);
        let b = folder("B", Some(a.id));
        a.parent_id = Some(b.id);
        let hanging = folder("Hanging", Some(b.id));
        let doc = file("doc.txt", Some(a.id));
        let safe = folder("Safe", None);

        let tree = TreeAssembler::new().assemble(
            vec![hanging.clone(), a.clone(), b.clone(), safe.clone()],
            vec![doc.clone()],
        );

        assert_eq!(tree.folders.len(), 1);
        assert_eq!(tree.folders[0].folder.id, safe.id);

        let reasons: HashMap<Uuid, AnomalyReason> =
            tree.anomalies.iter().map(|a| (a.id, a.reason)).collect();
        assert_eq!(reasons.len(), 4);
        assert_eq!(reasons[&a.id], AnomalyReason::Cycle);
        assert_eq!(reasons[&b.id], AnomalyReason::Cycle);
        assert_eq!(reasons[&hanging.id], AnomalyReason::ExcludedAncestor(b.id));
        assert_eq!(reasons[&doc.id], AnomalyReason::ExcludedAncestor(a.id));
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let mut selfish = folder("Self", None);
        selfish.parent_id = Some(selfish.id);
        let tree = TreeAssembler::new().assemble(vec![selfish.clone()], Vec::new());
        assert!(tree.folders.is_empty());
        assert_eq!(tree.anomalies.len(), 1);
        assert_eq!(tree.anomalies[0].reason, AnomalyReason::Cycle);
    }

    #[test]
    fn test_no_entity_appears_twice() {
        let root = folder("R", None);
        let mut parent = root.id;
        let mut all = vec![root];
        for i in 0..50 {
            let f = folder(&format!("d{i}"), Some(parent));
            parent = f.id;
            all.push(f);
        }
        let tree = TreeAssembler::new().assemble(all.clone(), Vec::new());
        assert_eq!(tree.total_folders(), 51);
        assert!(tree.find_folder(parent).is_some());
    }

    #[test]
    fn test_duplicate_rows_are_placed_once() {
        let docs = folder("Docs", None);
        let note = file("note.txt", Some(docs.id));

        let tree = TreeAssembler::new().assemble(
            vec![docs.clone(), docs.clone()],
            vec![note.clone(), note.clone()],
        );

        assert_eq!(tree.total_folders(), 1);
        assert_eq!(tree.total_files(), 1);
        assert_eq!(tree.folders[0].files, vec![note.clone()]);
        let reported: Vec<_> = tree
            .anomalies
            .iter()
            .map(|a| (a.kind, a.id, a.reason))
            .collect();
        assert_eq!(
            reported,
            [
                (EntityKind::Folder, docs.id, AnomalyReason::Duplicate),
                (EntityKind::File, note.id, AnomalyReason::Duplicate),
            ]
        );
    }

    #[test]
    fn test_deep_chain_assembles() {
        let root = folder("R", None);
        let mut parent = root.id;
        let mut all = vec![root];
        for i in 0..100_000 {
            let f = folder(&format!("d{i}"), Some(parent));
            parent = f.id;
            all.push(f);
        }
        // Leaf first so classification walks the full chain in one pass.
        all.reverse();

        let tree = TreeAssembler::new().assemble(all, Vec::new());
        assert!(tree.is_consistent());
        assert_eq!(tree.total_folders(), 100_001);
        assert!(tree.find_folder(parent).is_some());
    }

    #[test]
    fn test_integrity_error_is_masked() {
        let anomaly = TreeAnomaly {
            kind: EntityKind::Folder,
            id: Uuid::now_v7(),
            reason: AnomalyReason::Cycle,
        };
        let err = integrity_error(&[anomaly]);
        assert_eq!(err.kind, arbor_core::ErrorKind::Integrity);
        assert_eq!(err.public_message(), "Internal server error");
    }
}
