//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use arbor_entity::folder::{FilesystemTree, FolderNode};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(&items),
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + Tabled>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{}", Table::new(std::iter::once(item))),
        OutputFormat::Json => print_json(item),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Failed to encode output: {e}")),
    }
}

/// Print a nested tree, or its JSON form.
pub fn print_tree(tree: &FilesystemTree, format: OutputFormat) {
    if format == OutputFormat::Json {
        print_json(tree);
        return;
    }

    if tree.folders.is_empty() && tree.files.is_empty() {
        println!("(empty)");
    }
    let mut lines = Vec::new();
    for node in &tree.folders {
        render_node(node, 0, &mut lines);
    }
    for file in &tree.files {
        lines.push(file.name.clone());
    }
    for line in lines {
        println!("{line}");
    }

    println!();
    print_kv("Folders", &tree.total_folders().to_string());
    print_kv("Files", &tree.total_files().to_string());
    if !tree.is_consistent() {
        print_warning(&format!(
            "{} entries could not be placed in the tree",
            tree.anomalies.len()
        ));
    }
}

enum Line<'a> {
    Folder(&'a FolderNode),
    File(&'a str),
}

fn render_node(node: &FolderNode, depth: usize, lines: &mut Vec<String>) {
    let mut stack = vec![(Line::Folder(node), depth)];
    while let Some((line, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match line {
            Line::File(name) => lines.push(format!("{indent}{name}")),
            Line::Folder(node) => {
                lines.push(format!("{indent}{}/", node.folder.name));
                // Pushed in reverse: subfolders print before files.
                for file in node.files.iter().rev() {
                    stack.push((Line::File(&file.name), depth + 1));
                }
                for child in node.subfolders.iter().rev() {
                    stack.push((Line::Folder(child), depth + 1));
                }
            }
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<16} {}", format!("{key}:"), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_entity::File;
    use arbor_entity::folder::Folder;
    use chrono::Utc;
    use uuid::Uuid;

    fn node(name: &str) -> FolderNode {
        FolderNode::leaf(Folder {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            parent_id: None,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn file(name: &str) -> File {
        File {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            folder_id: None,
            name: name.to_string(),
            storage_path: format!("alice/{name}"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_node_indents_children() {
        let mut docs = node("Docs");
        let mut year = node("2024");
        year.files.push(file("a.tex"));
        docs.subfolders.push(year);
        docs.subfolders.push(node("2025"));
        docs.files.push(file("index.txt"));
        let mut lines = Vec::new();
        render_node(&docs, 0, &mut lines);
        assert_eq!(
            lines,
            ["Docs/", "  2024/", "    a.tex", "  2025/", "  index.txt"]
        );
    }

    #[test]
    fn test_render_deep_chain() {
        let depth = 5_000;
        let mut chain = node("leaf");
        for _ in 1..depth {
            let mut parent = node("dir");
            parent.subfolders.push(chain);
            chain = parent;
        }
        let mut lines = Vec::new();
        render_node(&chain, 0, &mut lines);
        assert_eq!(lines.len(), depth);
        assert!(lines[depth - 1].ends_with("leaf/"));
    }
}
