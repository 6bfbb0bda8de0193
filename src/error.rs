//! Error types for byte-histogram
//!
//! This module defines the error hierarchy for:
//! - Directory traversal and file reading
//! - Configuration and CLI validation
//! - Counter worker threads
//!
//! Every source error is fatal: a histogram built from a partial read would
//! misrepresent the corpus, so the run aborts on the first failure.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for a histogram run
#[derive(Error, Debug)]
pub enum HistogramError {
    /// Traversal and file read errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Errors raised while walking the tree and reading files
#[derive(Error, Debug, Clone)]
pub enum SourceError {
    /// Directory walk failed (unreadable directory, loop, vanished entry)
    #[error("Failed to traverse '{path}': {reason}")]
    Traversal { path: PathBuf, reason: String },

    /// Could not open a regular file
    #[error("Failed to open '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    /// Read failed part way through a file
    #[error("Failed to read '{path}': {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// Permission denied
    #[error("Permission denied: '{path}'")]
    PermissionDenied { path: PathBuf },

    /// Path not found
    #[error("Path not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Every counter worker hung up before the walk finished
    #[error("Chunk queue closed while reading '{path}'")]
    QueueClosed { path: PathBuf },
}

impl SourceError {
    /// Classify an open failure on `path`
    pub fn open(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => SourceError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SourceError::OpenFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// Classify a read failure on `path`
    pub fn read(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => SourceError::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => SourceError::ReadFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// Classify a directory walk failure rooted at `root`
    pub fn traversal(root: &Path, err: &walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => SourceError::PermissionDenied { path },
            Some(io::ErrorKind::NotFound) => SourceError::NotFound { path },
            _ => SourceError::Traversal {
                path,
                reason: err.to_string(),
            },
        }
    }

    /// The path the error is about
    pub fn path(&self) -> &Path {
        match self {
            SourceError::Traversal { path, .. }
            | SourceError::OpenFailed { path, .. }
            | SourceError::ReadFailed { path, .. }
            | SourceError::PermissionDenied { path }
            | SourceError::NotFound { path }
            | SourceError::QueueClosed { path } => path,
        }
    }
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid chunk size
    #[error("Invalid chunk size {size}: must be between 1 and {max}")]
    InvalidChunkSize { size: usize, max: usize },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid queue depth
    #[error("Invalid queue depth {depth}: must be at most {max}")]
    InvalidQueueDepth { depth: usize, max: usize },
}

/// Counter worker errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker panicked
    #[error("Worker {id} panicked: {message}")]
    Panicked { id: usize, message: String },

    /// Worker thread could not be started
    #[error("Failed to initialize worker {id}: {reason}")]
    InitFailed { id: usize, reason: String },
}

/// Result type alias for HistogramError
pub type Result<T> = std::result::Result<T, HistogramError>;

/// Result type alias for SourceError
pub type SourceResult<T> = std::result::Result<T, SourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_classification() {
        let path = Path::new("/data/secret.bin");

        let denied = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(matches!(
            SourceError::open(path, &denied),
            SourceError::PermissionDenied { .. }
        ));

        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            SourceError::open(path, &missing),
            SourceError::NotFound { .. }
        ));

        let other = io::Error::new(io::ErrorKind::Other, "device busy");
        let err = SourceError::open(path, &other);
        assert!(matches!(err, SourceError::OpenFailed { .. }));
        assert_eq!(err.path(), path);
        assert!(err.to_string().contains("device busy"));
    }

    #[test]
    fn test_read_error_classification() {
        let path = Path::new("/data/file.bin");
        let err = SourceError::read(path, &io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(err, SourceError::ReadFailed { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn test_traversal_error_on_missing_root() {
        let root = Path::new("/definitely/not/a/real/root");
        let err = walkdir::WalkDir::new(root)
            .into_iter()
            .find_map(|entry| entry.err())
            .unwrap();
        let err = SourceError::traversal(root, &err);
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert_eq!(err.path(), root);
    }

    #[test]
    fn test_error_conversion() {
        let source_err = SourceError::NotFound {
            path: "/missing".into(),
        };
        let err: HistogramError = source_err.into();
        assert!(matches!(err, HistogramError::Source(_)));
        assert!(err.to_string().contains("/missing"));

        let config_err = ConfigError::InvalidChunkSize { size: 0, max: 10 };
        let err: HistogramError = config_err.into();
        assert!(matches!(err, HistogramError::Config(_)));
    }
}
