//! Fans out one scan-then-remove pipeline per target and cleans up the
//! top-level directories once every pipeline has finished.

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error, info, warn};
use std::sync::Arc;

use crate::fs::{Filesystem, FsError};
use crate::remover::error::TargetError;
use crate::remover::scanner::TreeScanner;
use crate::remover::subtree::{SubtreeRemover, DEFAULT_MAX_IN_FLIGHT};
use crate::remover::target::{Phase, TargetPath, TargetState};

/// Knobs for a coordinator run.
#[derive(Debug, Clone, Copy)]
pub struct RemovalOptions {
    /// Bound on concurrently outstanding file deletions per target.
    pub max_in_flight: usize,
    /// Scan and report, never delete.
    pub dry_run: bool,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            dry_run: false,
        }
    }
}

/// Outcome of a whole run, one state per target in completion order.
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub targets: Vec<TargetState>,
    pub dry_run: bool,
}

impl RemovalReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &TargetState> {
        self.targets.iter().filter(|t| t.succeeded())
    }

    pub fn failed(&self) -> impl Iterator<Item = &TargetState> {
        self.targets.iter().filter(|t| t.phase() == Phase::Failed)
    }

    pub fn is_success(&self) -> bool {
        self.failed().next().is_none()
    }

    pub fn get(&self, target: &TargetPath) -> Option<&TargetState> {
        self.targets.iter().find(|t| t.target() == target)
    }

    pub fn files_removed(&self) -> usize {
        self.targets.iter().map(|t| t.stats().files_removed).sum()
    }

    pub fn directories_removed(&self) -> usize {
        self.targets
            .iter()
            .map(|t| t.stats().directories_removed + usize::from(t.stats().top_level_removed))
            .sum()
    }
}

/// Runs every target's pipeline concurrently on the current task.
pub struct RemovalCoordinator {
    fs: Arc<dyn Filesystem>,
    options: RemovalOptions,
}

impl RemovalCoordinator {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self::with_options(fs, RemovalOptions::default())
    }

    pub fn with_options(fs: Arc<dyn Filesystem>, options: RemovalOptions) -> Self {
        Self { fs, options }
    }

    /// Remove every target.
    ///
    /// A failing pipeline is recorded and logged but never blocks the others;
    /// top-level cleanup starts once all pipelines have finished either way,
    /// and skips the targets that failed.
    pub async fn remove_all(&self, targets: Vec<TargetPath>) -> RemovalReport {
        let mut report = RemovalReport {
            targets: Vec::with_capacity(targets.len()),
            dry_run: self.options.dry_run,
        };
        if targets.is_empty() {
            return report;
        }

        let mut outstanding = targets.len();
        let mut pipelines: FuturesUnordered<_> = targets
            .into_iter()
            .map(|target| {
                info!("Starting removal of {target}");
                self.run_pipeline(target)
            })
            .collect();

        while let Some(state) = pipelines.next().await {
            outstanding -= 1;
            match state.error() {
                Some(err) => error!("Error within {}: {err}", state.target()),
                None => info!(
                    "Finished removing {}, {outstanding} remaining",
                    state.target()
                ),
            }
            report.targets.push(state);
        }

        if !self.options.dry_run {
            self.remove_top_level(&mut report.targets).await;
        }
        report
    }

    async fn run_pipeline(&self, target: TargetPath) -> TargetState {
        let fs = self.fs.as_ref();
        let mut state = TargetState::new(target);

        let scan = match TreeScanner::new(fs).scan(state.target().path()).await {
            Ok(scan) => scan,
            Err(err) => {
                state.on_failed(err);
                return state;
            }
        };
        state.on_scanned(&scan);

        if self.options.dry_run {
            state.on_dry_run();
            return state;
        }

        let removed = SubtreeRemover::new(fs)
            .with_max_in_flight(self.options.max_in_flight)
            .remove(scan.files, scan.directories)
            .await;
        match removed {
            Ok(stats) => state.on_removed(stats),
            Err(err) => state.on_failed(err),
        }
        state
    }

    /// Delete each successful target's own directory, re-checking emptiness first.
    async fn remove_top_level(&self, states: &mut [TargetState]) {
        for state in states.iter_mut().filter(|s| s.succeeded()) {
            let path = state.target().path().to_path_buf();
            let result = match self.fs.is_empty_directory(&path).await {
                Ok(true) => self.fs.delete_empty_directory(&path).await,
                Ok(false) => Err(FsError::NotEmpty { path: path.clone() }),
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => {
                    debug!("removed top-level directory {}", path.display());
                    state.on_top_level_removed();
                }
                Err(err) => {
                    warn!("Could not remove {}: {err}", path.display());
                    state.on_failed(TargetError::removal(err));
                }
            }
        }
    }
}
