//! Recursive, concurrent enumeration of a target tree.
//!
//! Listings and classifications are independent futures polled from a single
//! task. Each directory under enumeration carries a count of its outstanding
//! operations (its own listing, then one classification per entry); it is
//! finished when that count drops to zero, and the scan is complete when no
//! directory is pending.

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use log::trace;
use std::collections::{BTreeSet, HashMap};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::fs::{EntryKind, Filesystem, FsError};
use crate::remover::classifier::FileClassifier;
use crate::remover::error::TargetError;

/// Everything found beneath one target root.
#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    pub files: BTreeSet<PathBuf>,
    pub directories: BTreeSet<PathBuf>,
    /// Directories whose children are still being enumerated, mapped to the
    /// number of operations still outstanding for them.
    pub pending: HashMap<PathBuf, usize>,
}

impl ScanResult {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    fn start_directory(&mut self, dir: &Path) {
        self.pending.insert(dir.to_path_buf(), 1);
    }

    /// The listing of `dir` resolved into `children` new operations.
    fn on_listed(&mut self, dir: &Path, children: usize) {
        self.settle(dir, |outstanding| outstanding - 1 + children);
    }

    /// One child of `dir` has been classified.
    fn on_child_resolved(&mut self, dir: &Path) {
        self.settle(dir, |outstanding| outstanding - 1);
    }

    fn settle(&mut self, dir: &Path, update: impl FnOnce(usize) -> usize) {
        let done = match self.pending.get_mut(dir) {
            Some(outstanding) => {
                *outstanding = update(*outstanding);
                *outstanding == 0
            }
            None => false,
        };
        if done {
            self.pending.remove(dir);
            trace!("enumerated {}", dir.display());
        }
    }
}

enum ScanEvent {
    Listed {
        dir: PathBuf,
        names: Result<Vec<OsString>, FsError>,
    },
    Classified {
        parent: PathBuf,
        path: PathBuf,
        kind: Result<EntryKind, FsError>,
    },
}

/// Walks a directory tree and sorts every descendant into files and directories.
pub struct TreeScanner<'a> {
    fs: &'a dyn Filesystem,
}

impl<'a> TreeScanner<'a> {
    pub fn new(fs: &'a dyn Filesystem) -> Self {
        Self { fs }
    }

    /// Scan `root` and return once every discovered directory is enumerated.
    ///
    /// The first failing listing or stat aborts the scan; no retries. A root
    /// that is not itself a directory (a symlink included) is never traversed.
    pub async fn scan(&self, root: &Path) -> Result<ScanResult, TargetError> {
        let classifier = FileClassifier::new(self.fs);
        if !classifier.classify(root).await.map_err(TargetError::scan)?.is_dir() {
            return Err(TargetError::scan(FsError::NotADirectory {
                path: root.to_path_buf(),
            }));
        }

        let mut result = ScanResult::default();
        let mut in_flight: FuturesUnordered<BoxFuture<'a, ScanEvent>> = FuturesUnordered::new();

        result.start_directory(root);
        in_flight.push(list(self.fs, root.to_path_buf()));

        while let Some(event) = in_flight.next().await {
            match event {
                ScanEvent::Listed { dir, names } => {
                    let names = names.map_err(TargetError::scan)?;
                    result.on_listed(&dir, names.len());
                    for name in names {
                        in_flight.push(classify(classifier, dir.clone(), dir.join(name)));
                    }
                }
                ScanEvent::Classified { parent, path, kind } => {
                    match kind.map_err(TargetError::scan)? {
                        EntryKind::Directory => {
                            // Recurse right away, siblings may still be resolving.
                            result.start_directory(&path);
                            in_flight.push(list(self.fs, path.clone()));
                            result.directories.insert(path);
                        }
                        EntryKind::File => {
                            result.files.insert(path);
                        }
                    }
                    result.on_child_resolved(&parent);
                }
            }
        }

        debug_assert!(result.is_complete());
        Ok(result)
    }
}

fn list(fs: &dyn Filesystem, dir: PathBuf) -> BoxFuture<'_, ScanEvent> {
    async move {
        let names = fs.list_directory(&dir).await;
        ScanEvent::Listed { dir, names }
    }
    .boxed()
}

fn classify(
    classifier: FileClassifier<'_>,
    parent: PathBuf,
    path: PathBuf,
) -> BoxFuture<'_, ScanEvent> {
    async move {
        let kind = classifier.classify(&path).await;
        ScanEvent::Classified { parent, path, kind }
    }
    .boxed()
}
