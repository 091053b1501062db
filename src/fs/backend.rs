use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

use crate::fs::types::{EntryKind, FsError};

/// The filesystem requests the remover is built on.
///
/// Every call is a non-blocking request; the remover only ever awaits them
/// from a single task, so implementations never see their own callbacks
/// running concurrently with state mutation.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// List the names of the direct entries of a directory.
    async fn list_directory(&self, path: &Path) -> Result<Vec<OsString>, FsError>;

    /// Classify a path without following symbolic links.
    async fn stat_path(&self, path: &Path) -> Result<EntryKind, FsError>;

    /// Unlink a file (or symbolic link).
    async fn delete_file(&self, path: &Path) -> Result<(), FsError>;

    /// Remove a directory. Fails with `NotEmpty` if it still has entries.
    async fn delete_empty_directory(&self, path: &Path) -> Result<(), FsError>;

    /// Fresh emptiness check, used right before a directory is deleted.
    async fn is_empty_directory(&self, path: &Path) -> Result<bool, FsError> {
        Ok(self.list_directory(path).await?.is_empty())
    }
}
