//! Entry name rules shared by folders and files.

use arbor_core::error::AppError;
use arbor_core::result::AppResult;

/// Maximum length of a folder or file name in bytes.
pub const MAX_NAME_BYTES: usize = 255;

/// Validate and normalize a user-supplied folder or file name.
///
/// Surrounding whitespace is trimmed. The result must be non-empty, at most
/// [`MAX_NAME_BYTES`] long, contain no `/`, and not be `.` or `..`.
pub fn validate_name(what: &str, name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{what} name cannot be empty")));
    }
    if trimmed.len() > MAX_NAME_BYTES {
        return Err(AppError::validation(format!(
            "{what} name exceeds {MAX_NAME_BYTES} bytes"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\0') {
        return Err(AppError::validation(format!(
            "{what} name cannot contain '/' or NUL"
        )));
    }
    if trimmed == "." || trimmed == ".." {
        return Err(AppError::validation(format!(
            "{what} name cannot be '.' or '..'"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::error::ErrorKind;

    #[test]
    fn test_trims_valid_names() {
        assert_eq!(validate_name("Folder", "  Docs ").unwrap(), "Docs");
        assert_eq!(validate_name("File", "report.tex").unwrap(), "report.tex");
    }

    #[test]
    fn test_rejects_invalid_names() {
        for bad in ["", "   ", "a/b", ".", "..", "nul\0byte"] {
            let err = validate_name("File", bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation, "accepted {bad:?}");
        }
        let long = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(validate_name("Folder", &long).is_err());
        assert!(validate_name("Folder", &"x".repeat(MAX_NAME_BYTES)).is_ok());
    }
}
