//! Run configuration: built-in defaults, optionally overridden by a TOML file,
//! then by command-line flags.

use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::manifest::DEFAULT_KEYS;
use crate::remover::subtree::DEFAULT_MAX_IN_FLIGHT;
use crate::remover::RemovalOptions;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "modsweep.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("max_in_flight must be at least 1")]
    ZeroInFlight,
}

/// Removal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Manifest listing the dependencies.
    pub manifest: PathBuf,
    /// Directory the dependency names are joined under.
    pub base_dir: PathBuf,
    /// Manifest sections to read.
    pub keys: Vec<String>,
    /// Bound on concurrently outstanding file deletions per target.
    pub max_in_flight: usize,
    /// Scan and report without deleting.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("package.json"),
            base_dir: PathBuf::from("node_modules"),
            keys: DEFAULT_KEYS.iter().map(|k| k.to_string()).collect(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            dry_run: false,
        }
    }
}

/// On-disk shape; every field is optional and overrides the default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    manifest: Option<PathBuf>,
    base_dir: Option<PathBuf>,
    keys: Option<Vec<String>>,
    max_in_flight: Option<usize>,
    dry_run: Option<bool>,
}

impl Config {
    /// Defaults overridden by `path`, or by `modsweep.toml` in `cwd` if no
    /// path is given. Only an explicitly named file is required to exist.
    pub fn load(path: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (cwd.join(DEFAULT_CONFIG_FILE), false),
        };

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };

        let mut config = Self::default();
        config.merge_toml(&path, &contents)?;
        Ok(config)
    }

    fn merge_toml(&mut self, path: &Path, contents: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(manifest) = file.manifest {
            self.manifest = manifest;
        }
        if let Some(base_dir) = file.base_dir {
            self.base_dir = base_dir;
        }
        if let Some(keys) = file.keys {
            self.keys = keys;
        }
        if let Some(max_in_flight) = file.max_in_flight {
            self.max_in_flight = max_in_flight;
        }
        if let Some(dry_run) = file.dry_run {
            self.dry_run = dry_run;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroInFlight);
        }
        Ok(())
    }

    pub fn removal_options(&self) -> RemovalOptions {
        RemovalOptions {
            max_in_flight: self.max_in_flight,
            dry_run: self.dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.manifest, PathBuf::from("package.json"));
        assert_eq!(config.base_dir, PathBuf::from("node_modules"));
        assert_eq!(config.keys.len(), 4);
        assert_eq!(config.keys[0], "devDependencies");
        assert!(!config.dry_run);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_implicit_file_is_optional() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_explicit_file_is_required() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("custom.toml");
        assert!(matches!(
            Config::load(Some(&missing), dir.path()),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "base_dir = \"vendor/modules\"\nkeys = [\"dependencies\"]\nmax_in_flight = 8\n",
        )
        .unwrap();

        let config = Config::load(None, dir.path()).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("vendor/modules"));
        assert_eq!(config.keys, vec!["dependencies".to_string()]);
        assert_eq!(config.max_in_flight, 8);
        assert_eq!(config.manifest, PathBuf::from("package.json"));
    }

    #[test]
    fn test_rejects_bad_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");

        fs::write(&path, "colour = \"blue\"\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), dir.path()),
            Err(ConfigError::Parse { .. })
        ));

        fs::write(&path, "max_in_flight = 0\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), dir.path()),
            Err(ConfigError::ZeroInFlight)
        ));
    }
}
