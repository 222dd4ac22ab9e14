//! File helpers for command input and output
//!
//! Failures carry the offending path so they can be shown to the user.

use crate::error::ToolError;
use std::path::Path;

/// Read a UTF-8 text file
pub fn read_text(path: &Path) -> Result<String, ToolError> {
    std::fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a text file, replacing any existing contents
pub fn write_text(path: &Path, contents: &str) -> Result<(), ToolError> {
    std::fs::write(path, contents).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("job.json");

        let err = read_text(&path).unwrap_err();
        assert_eq!(err.kind(), "io_error");
        assert!(matches!(err, ToolError::Io { path: ref p, .. } if *p == path));
        assert!(err.user_message().ends_with("job.json does not exist."));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("outline.json");

        write_text(&path, "{\"scenes\": []}").unwrap();
        assert_eq!(read_text(&path).unwrap(), "{\"scenes\": []}");
    }

    #[test]
    fn test_write_into_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");

        let err = write_text(&path, "{}").unwrap_err();
        assert_eq!(err.kind(), "io_error");
    }
}
