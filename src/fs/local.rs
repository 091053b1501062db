use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::fs::backend::Filesystem;
use crate::fs::types::{EntryKind, FsError};

/// Local filesystem backed by `tokio::fs`.
///
/// Relative paths are resolved against `root`, absolute paths are used as-is.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl Filesystem for LocalFs {
    async fn list_directory(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
        let full = self.full_path(path);
        let mut read_dir = tokio::fs::read_dir(&full)
            .await
            .map_err(|e| FsError::from_io(e, "list directory", path))?;

        let mut names = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(e, "list directory", path))?
        {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn stat_path(&self, path: &Path) -> Result<EntryKind, FsError> {
        let metadata = tokio::fs::symlink_metadata(self.full_path(path))
            .await
            .map_err(|e| FsError::from_io(e, "stat", path))?;

        if metadata.is_dir() {
            Ok(EntryKind::Directory)
        } else {
            Ok(EntryKind::File)
        }
    }

    async fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        tokio::fs::remove_file(self.full_path(path))
            .await
            .map_err(|e| FsError::from_io(e, "delete file", path))
    }

    async fn delete_empty_directory(&self, path: &Path) -> Result<(), FsError> {
        tokio::fs::remove_dir(self.full_path(path))
            .await
            .map_err(|e| FsError::from_io(e, "delete directory", path))
    }
}
