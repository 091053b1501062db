use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

use crate::config::Config;

/// Remove the dependency directories a package manifest declares.
#[derive(Debug, Parser)]
#[command(name = "modsweep", version, about)]
pub struct Cli {
    /// Manifest sections to read (default: devDependencies optionalDependencies
    /// dependencies bundledDependencies)
    #[arg(value_name = "KEY")]
    pub keys: Vec<String>,

    /// Path to the manifest
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory the dependency names live under
    #[arg(short, long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Config file (default: ./modsweep.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum concurrent file deletions per dependency
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_in_flight: Option<u32>,

    /// Scan and report without deleting anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Log every phase transition
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if !self.keys.is_empty() {
            config.keys = self.keys.clone();
        }
        if let Some(manifest) = &self.manifest {
            config.manifest = manifest.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = base_dir.clone();
        }
        if let Some(max_in_flight) = self.max_in_flight {
            config.max_in_flight = max_in_flight as usize;
        }
        if self.dry_run {
            config.dry_run = true;
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}
