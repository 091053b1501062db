//! Targets and the per-target pipeline state.

use log::debug;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::remover::error::{InvalidTarget, TargetError};
use crate::remover::scanner::ScanResult;
use crate::remover::subtree::RemovalStats;

/// One top-level directory slated for full deletion, e.g. `node_modules/foo`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetPath(PathBuf);

impl TargetPath {
    /// Join a dependency name under `base`.
    ///
    /// The name must be relative and made of plain components only, so the
    /// resulting path can never leave `base`. Scoped names (`@scope/pkg`) pass.
    pub fn from_dependency(base: &Path, name: &str) -> Result<Self, InvalidTarget> {
        let invalid = |reason| InvalidTarget {
            name: name.to_string(),
            reason,
        };

        if name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }

        let relative = Path::new(name);
        for component in relative.components() {
            match component {
                Component::Normal(_) => {}
                Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid("name must be a relative path"));
                }
                Component::CurDir | Component::ParentDir => {
                    return Err(invalid("name must not contain '.' or '..'"));
                }
            }
        }

        Ok(Self(base.join(relative)))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl From<PathBuf> for TargetPath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Where a target's pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Removing,
    Done,
    Failed,
}

/// Counters reported for one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetStats {
    pub files_found: usize,
    pub directories_found: usize,
    pub files_removed: usize,
    pub directories_removed: usize,
    /// The target's own top-level directory was removed.
    pub top_level_removed: bool,
}

/// State machine for one target: Scanning -> Removing -> Done, or Failed.
#[derive(Debug)]
pub struct TargetState {
    target: TargetPath,
    phase: Phase,
    stats: TargetStats,
    error: Option<TargetError>,
}

impl TargetState {
    pub fn new(target: TargetPath) -> Self {
        Self {
            target,
            phase: Phase::Scanning,
            stats: TargetStats::default(),
            error: None,
        }
    }

    pub fn target(&self) -> &TargetPath {
        &self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &TargetStats {
        &self.stats
    }

    pub fn error(&self) -> Option<&TargetError> {
        self.error.as_ref()
    }

    pub fn succeeded(&self) -> bool {
        self.phase == Phase::Done
    }

    /// The scan finished; the removal phase may start.
    pub fn on_scanned(&mut self, scan: &ScanResult) {
        debug_assert_eq!(self.phase, Phase::Scanning);
        self.stats.files_found = scan.files.len();
        self.stats.directories_found = scan.directories.len();
        self.phase = Phase::Removing;
        debug!(
            "{}: scan complete ({} files, {} directories)",
            self.target, self.stats.files_found, self.stats.directories_found
        );
    }

    /// Every file and nested directory of the target is gone.
    pub fn on_removed(&mut self, removed: RemovalStats) {
        debug_assert_eq!(self.phase, Phase::Removing);
        self.stats.files_removed = removed.files;
        self.stats.directories_removed = removed.directories;
        self.phase = Phase::Done;
    }

    /// Dry runs stop after scanning.
    pub fn on_dry_run(&mut self) {
        self.phase = Phase::Done;
    }

    /// The top-level directory itself was removed during final cleanup.
    pub fn on_top_level_removed(&mut self) {
        self.stats.top_level_removed = true;
    }

    pub fn on_failed(&mut self, error: TargetError) {
        self.phase = Phase::Failed;
        self.error = Some(error);
    }
}
