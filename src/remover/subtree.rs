//! Deletion of a scanned subtree: files first, then directories once empty.

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, trace};
use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;

use crate::fs::{Filesystem, FsError};
use crate::remover::error::TargetError;

/// Default bound on concurrently outstanding file deletions.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 64;

/// What a successful removal deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalStats {
    pub files: usize,
    pub directories: usize,
}

/// Deletes the files and directories found by a scan.
///
/// A directory is deleted only after a fresh listing shows it empty, so
/// deepest directories go first without any explicit depth ordering.
pub struct SubtreeRemover<'a> {
    fs: &'a dyn Filesystem,
    max_in_flight: usize,
}

impl<'a> SubtreeRemover<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self {
            fs,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub async fn remove(
        &self,
        files: BTreeSet<PathBuf>,
        directories: BTreeSet<PathBuf>,
    ) -> Result<RemovalStats, TargetError> {
        let mut stats = RemovalStats::default();

        stats.files = self.remove_files(files).await?;
        if directories.is_empty() {
            return Ok(stats);
        }

        debug!(
            "removed {} files, removing {} directories",
            stats.files,
            directories.len()
        );
        stats.directories = self.remove_directories(directories).await?;
        Ok(stats)
    }

    async fn remove_files(&self, files: BTreeSet<PathBuf>) -> Result<usize, TargetError> {
        let fs = self.fs;
        let removed: Vec<()> = stream::iter(files)
            .map(|file| async move {
                trace!("unlink {}", file.display());
                fs.delete_file(&file).await
            })
            .buffer_unordered(self.max_in_flight)
            .try_collect()
            .await
            .map_err(TargetError::removal)?;
        Ok(removed.len())
    }

    /// Drain the directory set with requeue passes.
    ///
    /// Seeding in reverse path order puts children ahead of their parents, so
    /// a single pass usually suffices. A full pass without any deletion means
    /// something outside the scan keeps a directory populated.
    async fn remove_directories(
        &self,
        directories: BTreeSet<PathBuf>,
    ) -> Result<usize, TargetError> {
        let mut queue: VecDeque<PathBuf> = directories.into_iter().rev().collect();
        let mut removed = 0;
        let mut skipped_in_a_row = 0;

        while let Some(dir) = queue.pop_front() {
            let empty = self
                .fs
                .is_empty_directory(&dir)
                .await
                .map_err(TargetError::removal)?;

            if empty {
                trace!("rmdir {}", dir.display());
                self.fs
                    .delete_empty_directory(&dir)
                    .await
                    .map_err(TargetError::removal)?;
                removed += 1;
                skipped_in_a_row = 0;
                continue;
            }

            skipped_in_a_row += 1;
            if skipped_in_a_row > queue.len() {
                return Err(TargetError::removal(FsError::NotEmpty { path: dir }));
            }
            queue.push_back(dir);
        }

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFs;
    use crate::remover::scanner::TreeScanner;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_remove_files_only() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("foo")).unwrap();
        fs::write(dir.path().join("foo/a.txt"), b"a").unwrap();
        fs::write(dir.path().join("foo/b.txt"), b"b").unwrap();

        let local = LocalFs::new(dir.path());
        let files = BTreeSet::from([PathBuf::from("foo/a.txt"), PathBuf::from("foo/b.txt")]);
        let stats = SubtreeRemover::new(&local)
            .remove(files, BTreeSet::new())
            .await
            .unwrap();

        assert_eq!(stats, RemovalStats { files: 2, directories: 0 });
        assert_eq!(fs::read_dir(dir.path().join("foo")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_directories_out_of_depth_order() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("t/a/b/c")).unwrap();
        fs::create_dir_all(dir.path().join("t/d")).unwrap();

        let local = LocalFs::new(dir.path());
        let dirs = BTreeSet::from([
            PathBuf::from("t/a"),
            PathBuf::from("t/a/b"),
            PathBuf::from("t/a/b/c"),
            PathBuf::from("t/d"),
        ]);
        let stats = SubtreeRemover::new(&local)
            .with_max_in_flight(1)
            .remove(BTreeSet::new(), dirs)
            .await
            .unwrap();

        assert_eq!(stats.directories, 4);
        assert!(dir.path().join("t").exists());
        assert_eq!(fs::read_dir(dir.path().join("t")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_scan_then_remove_leaves_root_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("baz");
        fs::create_dir_all(root.join("inner/deeper")).unwrap();
        fs::write(root.join("inner/c.txt"), b"c").unwrap();
        fs::write(root.join("inner/deeper/d.txt"), b"d").unwrap();
        fs::write(root.join("top.txt"), b"t").unwrap();

        let local = LocalFs::new(dir.path());
        let scan = TreeScanner::new(&local).scan(Path::new("baz")).await.unwrap();
        let stats = SubtreeRemover::new(&local)
            .remove(scan.files, scan.directories)
            .await
            .unwrap();

        assert_eq!(stats, RemovalStats { files: 3, directories: 2 });
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unscanned_content_reports_not_empty() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("t/a")).unwrap();
        fs::write(dir.path().join("t/a/stray"), b"").unwrap();

        let local = LocalFs::new(dir.path());
        let err = SubtreeRemover::new(&local)
            .remove(BTreeSet::new(), BTreeSet::from([PathBuf::from("t/a")]))
            .await
            .unwrap_err();

        assert!(!err.is_scan());
        assert_eq!(err.path(), Path::new("t/a"));
        assert!(dir.path().join("t/a/stray").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_removal_error() {
        let dir = tempdir().unwrap();
        let local = LocalFs::new(dir.path());
        let err = SubtreeRemover::new(&local)
            .remove(BTreeSet::from([PathBuf::from("ghost.txt")]), BTreeSet::new())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TargetError::Removal {
                cause: FsError::NotFound { .. },
                ..
            }
        ));
    }
}
