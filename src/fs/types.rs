use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What a single directory entry turned out to be.
///
/// Symbolic links are reported as `File`: they are unlinked, never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn is_dir(self) -> bool {
        matches!(self, EntryKind::Directory)
    }
}

/// A filesystem request that could not complete.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("access denied: {}", path.display())]
    AccessDenied { path: PathBuf },

    #[error("not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("directory not empty: {}", path.display())]
    NotEmpty { path: PathBuf },

    #[error("{operation} failed for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    /// Map an `io::Error` onto the variants callers branch on, keeping the path.
    pub fn from_io(err: io::Error, operation: &'static str, path: &Path) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path },
            io::ErrorKind::PermissionDenied => FsError::AccessDenied { path },
            io::ErrorKind::NotADirectory => FsError::NotADirectory { path },
            io::ErrorKind::DirectoryNotEmpty => FsError::NotEmpty { path },
            _ => FsError::Io {
                path,
                operation,
                source: err,
            },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FsError::NotFound { path }
            | FsError::AccessDenied { path }
            | FsError::NotADirectory { path }
            | FsError::NotEmpty { path }
            | FsError::Io { path, .. } => path,
        }
    }
}
