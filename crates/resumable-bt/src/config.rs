//! Controller configuration loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decorator::INFINITE_LOOPS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Runtime options of a [`TreeController`](crate::TreeController).
///
/// ```toml
/// trace = true
/// seed = 42
/// root_loops = -1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Attach a [`StatusTrace`](crate::StatusTrace) recording each tick's statuses.
    pub trace: bool,
    /// Seed for the shuffling source. Entropy is used when absent.
    pub seed: Option<u64>,
    /// Loop count of the default root repeater.
    pub root_loops: i32,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self {
            trace: false,
            seed: None,
            root_loops: INFINITE_LOOPS,
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
