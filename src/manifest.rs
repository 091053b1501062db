//! Manifest reading: turns the dependency sections of a `package.json` into
//! target paths.

use log::warn;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::remover::TargetPath;

/// Manifest sections read when none are named explicitly.
pub const DEFAULT_KEYS: &[&str] = &[
    "devDependencies",
    "optionalDependencies",
    "dependencies",
    "bundledDependencies",
];

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse manifest {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("manifest {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

/// A parsed manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    root: Map<String, Value>,
}

impl Manifest {
    pub async fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ManifestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_str(contents).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Dependency names declared under `keys`, first occurrence wins.
    ///
    /// Object sections contribute their keys, array sections their string
    /// elements. Missing or malformed sections are logged and skipped.
    pub fn dependency_names<S: AsRef<str>>(&self, keys: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();

        for key in keys {
            let key = key.as_ref();
            let section: Vec<&str> = match self.root.get(key) {
                None => {
                    warn!("{key} not found in {}", self.path.display());
                    continue;
                }
                Some(Value::Object(deps)) => deps.keys().map(String::as_str).collect(),
                Some(Value::Array(deps)) => deps.iter().filter_map(Value::as_str).collect(),
                Some(_) => {
                    warn!("{key} in {} is not a list of dependencies", self.path.display());
                    continue;
                }
            };

            for name in section {
                if seen.insert(name) {
                    names.push(name.to_string());
                }
            }
        }

        names
    }

    /// Target paths under `base` for the dependencies declared under `keys`.
    /// Names that would escape `base` are logged and dropped.
    pub fn targets<S: AsRef<str>>(&self, base: &Path, keys: &[S]) -> Vec<TargetPath> {
        self.dependency_names(keys)
            .iter()
            .filter_map(|name| match TargetPath::from_dependency(base, name) {
                Ok(target) => Some(target),
                Err(err) => {
                    warn!("Skipping {err}");
                    None
                }
            })
            .collect()
    }
}
