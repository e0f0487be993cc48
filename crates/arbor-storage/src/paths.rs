//! Storage path layout.
//!
//! Paths look like `{owner}/{folder_id | root}/{object_id}/{name}`. The
//! object id is fresh per write, so renames, moves, and re-uploads never
//! overwrite another file's bytes.

use uuid::Uuid;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;

/// Assign a new storage path for a file's bytes.
pub fn blob_path(owner: &str, folder_id: Option<Uuid>, name: &str) -> String {
    let scope = folder_id.map_or_else(|| "root".to_string(), |id| id.to_string());
    format!(
        "{}/{scope}/{}/{}",
        sanitize_segment(owner),
        Uuid::now_v7(),
        sanitize_segment(name)
    )
}

/// Make one path segment safe for any backend.
///
/// Separators and control characters become `_`; a segment made only of
/// dots (or nothing) becomes `_`.
pub fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Split a storage path into segments, rejecting anything that could
/// escape the storage root.
pub fn checked_segments(path: &str) -> AppResult<Vec<&str>> {
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let invalid = segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'));
    if invalid {
        return Err(AppError::validation(format!("Invalid storage path '{path}'")));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_path_layout() {
        let folder = Uuid::new_v4();
        let path = blob_path("user-1", Some(folder), "a.tex");
        let parts: Vec<&str> = path.split('/').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "user-1");
        assert_eq!(parts[1], folder.to_string());
        assert!(Uuid::parse_str(parts[2]).is_ok());
        assert_eq!(parts[3], "a.tex");

        assert!(blob_path("user-1", None, "b.tex").starts_with("user-1/root/"));
    }

    #[test]
    fn test_blob_paths_are_unique_per_write() {
        assert_ne!(blob_path("u", None, "x"), blob_path("u", None, "x"));
    }

    #[test]
    fn test_sanitize_segment() {
        assert_eq!(sanitize_segment("notes.txt"), "notes.txt");
        assert_eq!(sanitize_segment("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_segment(".."), "_");
        assert_eq!(sanitize_segment(""), "_");
        assert_eq!(sanitize_segment("tab\there"), "tab_here");
    }

    #[test]
    fn test_checked_segments() {
        assert_eq!(checked_segments("a/b/c").unwrap(), ["a", "b", "c"]);
        assert_eq!(checked_segments("/a/b").unwrap(), ["a", "b"]);
        assert!(checked_segments("a/../b").is_err());
        assert!(checked_segments("a//b").is_err());
        assert!(checked_segments("").is_err());
        assert!(checked_segments("a\\..\\b").is_err());
    }
}
