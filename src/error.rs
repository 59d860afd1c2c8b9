//! Error types for repocat.
//!
//! Per-file problems during a scan (unreadable, oversized, binary) are
//! handled locally as skips and never appear here; this module covers the
//! failures that abort an operation: a root that cannot be enumerated,
//! diff-range validation, and the git subprocess.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unified error type for all repocat operations.
#[derive(Error, Debug)]
pub enum RepocatError {
    /// Scan root does not exist or is not a directory.
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// Scan root exists but cannot be read.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// I/O operation failed.
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A diff-range token contains a character outside the allow-list.
    /// Raised before any process is spawned.
    #[error("Invalid diff range token: {token}")]
    InvalidRangeToken { token: String },

    /// The diff tool reported that the working directory is not a repository.
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// The git executable is not available on PATH.
    #[error("git executable not found on PATH")]
    ToolNotFound,

    /// The diff tool exited with a non-zero status.
    #[error("git exited with status {code}: {stderr}")]
    ProcessError { code: i32, stderr: String },

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A background task failed to complete.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for repocat operations.
pub type Result<T> = std::result::Result<T, RepocatError>;

impl RepocatError {
    /// Create an I/O read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: "read",
            source,
        }
    }

    /// Create an I/O write error.
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: "write",
            source,
        }
    }

    /// Classify an enumeration failure on a scan root.
    pub fn from_root_io(root: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::DirectoryNotFound(root.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(root.to_path_buf()),
            _ => Self::Io {
                path: root.to_path_buf(),
                operation: "enumerate",
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_read_error_display() {
        let err = RepocatError::read_error(
            "/path/to/file",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/path/to/file"));
        assert!(err.to_string().contains("read"));
    }

    #[test]
    fn test_from_root_io_not_found() {
        let err = RepocatError::from_root_io(
            Path::new("/missing"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, RepocatError::DirectoryNotFound(_)));
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_from_root_io_permission_denied() {
        let err = RepocatError::from_root_io(
            Path::new("/locked"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, RepocatError::PermissionDenied(_)));
    }

    #[test]
    fn test_invalid_range_token_names_offender() {
        let err = RepocatError::InvalidRangeToken {
            token: "HEAD;".to_string(),
        };
        assert!(err.to_string().contains("HEAD;"));
    }

    #[test]
    fn test_process_error_display() {
        let err = RepocatError::ProcessError {
            code: 128,
            stderr: "fatal: bad revision".to_string(),
        };
        assert!(err.to_string().contains("128"));
        assert!(err.to_string().contains("bad revision"));
    }
}
