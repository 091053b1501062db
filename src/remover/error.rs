use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fs::FsError;

/// Terminal failure of one target's pipeline.
///
/// `path` is the entry the failing request was issued for, which may be
/// anywhere inside the target tree.
#[derive(Debug, Error)]
pub enum TargetError {
    /// A directory listing or stat failed. Nothing was deleted for the target.
    #[error("scan failed at {}: {cause}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        cause: FsError,
    },

    /// A delete failed. The target may be partially removed.
    #[error("removal failed at {}: {cause}", path.display())]
    Removal {
        path: PathBuf,
        #[source]
        cause: FsError,
    },
}

impl TargetError {
    pub fn scan(cause: FsError) -> Self {
        TargetError::Scan {
            path: cause.path().to_path_buf(),
            cause,
        }
    }

    pub fn removal(cause: FsError) -> Self {
        TargetError::Removal {
            path: cause.path().to_path_buf(),
            cause,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            TargetError::Scan { path, .. } | TargetError::Removal { path, .. } => path,
        }
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, TargetError::Scan { .. })
    }
}

/// A dependency name that cannot be turned into a path under the base directory.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid dependency name {name:?}: {reason}")]
pub struct InvalidTarget {
    pub name: String,
    pub reason: &'static str,
}
