use std::path::Path;

use crate::fs::{EntryKind, Filesystem, FsError};

/// Classifies paths as files or directories with a single metadata query.
#[derive(Clone, Copy)]
pub struct FileClassifier<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> FileClassifier<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    pub async fn classify(&self, path: &Path) -> Result<EntryKind, FsError> {
        self.fs.stat_path(path).await
    }
}
