// Shared helpers for integration tests: tree builders and a recording,
// fault-injecting filesystem wrapper.

#![allow(dead_code)]

use async_trait::async_trait;
use modsweep::fs::{EntryKind, Filesystem, FsError, LocalFs};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One filesystem request as seen by the wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    List(PathBuf),
    Stat(PathBuf),
    EmptinessCheck(PathBuf),
    DeleteFile(PathBuf),
    DeleteDir(PathBuf),
}

impl Op {
    pub fn path(&self) -> &Path {
        match self {
            Op::List(p)
            | Op::Stat(p)
            | Op::EmptinessCheck(p)
            | Op::DeleteFile(p)
            | Op::DeleteDir(p) => p,
        }
    }

    pub fn is_delete(&self) -> bool {
        matches!(self, Op::DeleteFile(_) | Op::DeleteDir(_))
    }
}

/// Wraps `LocalFs`, records every request and checks that directories are
/// empty on disk at the moment they are deleted.
pub struct RecordingFs {
    inner: LocalFs,
    ops: Mutex<Vec<Op>>,
    non_empty_deletes: Mutex<Vec<PathBuf>>,
    fail_list: HashSet<PathBuf>,
    fail_delete: HashSet<PathBuf>,
}

impl RecordingFs {
    pub fn new(root: &Path) -> Self {
        Self {
            inner: LocalFs::new(root),
            ops: Mutex::new(Vec::new()),
            non_empty_deletes: Mutex::new(Vec::new()),
            fail_list: HashSet::new(),
            fail_delete: HashSet::new(),
        }
    }

    /// Listing `path` fails with `AccessDenied`.
    pub fn fail_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_list.insert(path.into());
        self
    }

    /// Deleting `path` fails with `AccessDenied`.
    pub fn fail_delete(mut self, path: impl Into<PathBuf>) -> Self {
        self.fail_delete.insert(path.into());
        self
    }

    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    pub fn ops_under(&self, root: &Path) -> Vec<Op> {
        self.ops()
            .into_iter()
            .filter(|op| op.path().starts_with(root))
            .collect()
    }

    pub fn non_empty_deletes(&self) -> Vec<PathBuf> {
        self.non_empty_deletes.lock().unwrap().clone()
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }

    fn denied(path: &Path) -> FsError {
        FsError::AccessDenied {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Filesystem for RecordingFs {
    async fn list_directory(&self, path: &Path) -> Result<Vec<OsString>, FsError> {
        self.record(Op::List(path.to_path_buf()));
        if self.fail_list.contains(path) {
            return Err(Self::denied(path));
        }
        self.inner.list_directory(path).await
    }

    async fn stat_path(&self, path: &Path) -> Result<EntryKind, FsError> {
        self.record(Op::Stat(path.to_path_buf()));
        self.inner.stat_path(path).await
    }

    async fn delete_file(&self, path: &Path) -> Result<(), FsError> {
        self.record(Op::DeleteFile(path.to_path_buf()));
        if self.fail_delete.contains(path) {
            return Err(Self::denied(path));
        }
        self.inner.delete_file(path).await
    }

    async fn delete_empty_directory(&self, path: &Path) -> Result<(), FsError> {
        self.record(Op::DeleteDir(path.to_path_buf()));
        let on_disk = self.inner.root().join(path);
        let populated = fs::read_dir(&on_disk)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false);
        if populated {
            self.non_empty_deletes.lock().unwrap().push(path.to_path_buf());
        }
        if self.fail_delete.contains(path) {
            return Err(Self::denied(path));
        }
        self.inner.delete_empty_directory(path).await
    }

    async fn is_empty_directory(&self, path: &Path) -> Result<bool, FsError> {
        self.record(Op::EmptinessCheck(path.to_path_buf()));
        Ok(self.inner.list_directory(path).await?.is_empty())
    }
}

/// Create every file (with its parent directories) and every directory
/// listed, relative to `root`. Directory entries end with `/`.
pub fn build_tree(root: &Path, entries: &[&str]) {
    for entry in entries {
        let path = root.join(entry.trim_end_matches('/'));
        if entry.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
        } else {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, entry.as_bytes()).unwrap();
        }
    }
}

pub fn position(ops: &[Op], op: &Op) -> usize {
    ops.iter()
        .position(|o| o == op)
        .unwrap_or_else(|| panic!("{op:?} never happened in {ops:#?}"))
}
