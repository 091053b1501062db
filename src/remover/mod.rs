//! Remover module - concurrent deletion of dependency module trees.
//!
//! Each target is scanned into files and directories, the files are deleted,
//! and directories are deleted once a fresh listing shows them empty. The
//! coordinator runs one such pipeline per target and removes the top-level
//! directories after all of them have finished.

pub mod classifier;
pub mod coordinator;
pub mod error;
pub mod scanner;
pub mod subtree;
pub mod target;

pub use classifier::FileClassifier;
pub use coordinator::{RemovalCoordinator, RemovalOptions, RemovalReport};
pub use error::{InvalidTarget, TargetError};
pub use scanner::{ScanResult, TreeScanner};
pub use subtree::{RemovalStats, SubtreeRemover};
pub use target::{Phase, TargetPath, TargetState, TargetStats};
