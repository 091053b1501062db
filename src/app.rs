use anyhow::{Context, Result};
use colored::Colorize;
use log::info;
use std::sync::Arc;

use crate::config::Config;
use crate::fs::LocalFs;
use crate::manifest::Manifest;
use crate::remover::{RemovalCoordinator, RemovalReport};

/// Read the manifest and remove every declared dependency directory.
///
/// Paths in `config` are resolved against `fs`'s root. Per-target failures
/// are carried in the report; only manifest problems are returned as errors.
pub async fn run(config: &Config, fs: LocalFs) -> Result<RemovalReport> {
    config.validate()?;

    let manifest_path = fs.root().join(&config.manifest);
    let manifest = Manifest::load(&manifest_path)
        .await
        .with_context(|| format!("Cannot read dependencies from {}", config.manifest.display()))?;

    let targets = manifest.targets(&config.base_dir, config.keys.as_slice());
    if targets.is_empty() {
        info!("No dependencies to remove");
        return Ok(RemovalReport {
            dry_run: config.dry_run,
            ..Default::default()
        });
    }

    let coordinator = RemovalCoordinator::with_options(Arc::new(fs), config.removal_options());
    Ok(coordinator.remove_all(targets).await)
}

/// Human-readable summary for the end of a run.
pub fn summary(report: &RemovalReport) -> String {
    let mut lines = Vec::new();

    if report.dry_run {
        for state in report.succeeded() {
            lines.push(format!(
                "{} {} ({} files, {} directories)",
                "would remove".yellow(),
                state.target(),
                state.stats().files_found,
                state.stats().directories_found
            ));
        }
    } else {
        lines.push(format!(
            "{} {} dependencies ({} files, {} directories)",
            "Removed".green().bold(),
            report.succeeded().count(),
            report.files_removed(),
            report.directories_removed()
        ));
    }

    for state in report.failed() {
        let reason = state
            .error()
            .map(ToString::to_string)
            .unwrap_or_default();
        lines.push(format!("{} {}: {}", "Failed".red().bold(), state.target(), reason));
    }

    lines.join("\n")
}
