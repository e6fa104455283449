//! Error types for hashside_core.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using hashside_core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or deleting sidecars.
#[derive(Error, Debug)]
pub enum Error {
    /// Unsupported algorithm identifier.
    #[error("Unsupported algorithm: {algorithm} (supported: {supported})")]
    UnsupportedAlgorithm {
        algorithm: String,
        supported: String,
    },

    /// The target path does not exist.
    #[error("Target does not exist: {path}")]
    TargetNotFound { path: PathBuf },

    /// A file target was requested but the path is not a regular file.
    #[error("Not a file: {path}")]
    NotAFile { path: PathBuf },

    /// A directory target was requested but the path is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Reading a source file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing a sidecar failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Removing a sidecar failed.
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory traversal failed below the walk root.
    #[error("Failed to walk {path}: {reason}")]
    Walk { path: PathBuf, reason: String },
}

impl Error {
    /// Create an UnsupportedAlgorithm error.
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Error::UnsupportedAlgorithm {
            algorithm: algorithm.into(),
            supported: crate::hash::Algorithm::ALL
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a TargetNotFound error.
    pub fn target_not_found(path: impl Into<PathBuf>) -> Self {
        Error::TargetNotFound { path: path.into() }
    }

    /// Create a Read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    /// Create a Write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a Remove error.
    pub fn remove(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Remove {
            path: path.into(),
            source,
        }
    }

    /// Whether this error must abort the run before any file is touched.
    ///
    /// Everything else is recorded against a single file and the run goes on.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedAlgorithm { .. }
                | Error::TargetNotFound { .. }
                | Error::NotAFile { .. }
                | Error::NotADirectory { .. }
        )
    }

    /// The path this error is about, if it has one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Error::TargetNotFound { path }
            | Error::NotAFile { path }
            | Error::NotADirectory { path }
            | Error::Read { path, .. }
            | Error::Write { path, .. }
            | Error::Remove { path, .. }
            | Error::Walk { path, .. } => Some(path),
            Error::UnsupportedAlgorithm { .. } => None,
        }
    }
}

impl Error {
    /// Convert an `ignore` walk error, falling back to `root` when the error
    /// carries no path of its own.
    pub(crate) fn from_walk(err: ignore::Error, root: &std::path::Path) -> Self {
        let path = walk_error_path(&err).unwrap_or(root).to_path_buf();
        Error::Walk {
            path,
            reason: err.to_string(),
        }
    }
}

fn walk_error_path(err: &ignore::Error) -> Option<&std::path::Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            walk_error_path(err)
        }
        ignore::Error::Partial(errs) => errs.iter().find_map(walk_error_path),
        _ => None,
    }
}
