//! Scan configuration
//!
//! Loaded from an optional `typedep.toml`. Every field has a default, so an
//! empty or partial file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use typedep_core::{Result, TypeGraphError};

/// Config file looked up in the working directory when no path is given.
pub const CONFIG_FILE: &str = "typedep.toml";

/// Top-level scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Number of worker threads draining the work queue.
    pub workers: usize,
    /// Bound on the number of queued, not yet claimed, file paths.
    pub queue_capacity: usize,
    /// Directory names whose subtrees are never scanned.
    pub excluded_dirs: Vec<String>,
    /// Glob patterns of paths to skip, matched against the full path.
    pub exclude: Vec<String>,
    /// Honour `.gitignore` and `.ignore` files while walking.
    pub respect_gitignore: bool,
    pub output: OutputConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 7,
            queue_capacity: 7,
            excluded_dirs: vec!["tests".to_string()],
            exclude: Vec::new(),
            respect_gitignore: false,
            output: OutputConfig::default(),
        }
    }
}

/// Where the nodes and edges files are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub nodes_file: PathBuf,
    pub edges_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            nodes_file: PathBuf::from("types.txt"),
            edges_file: PathBuf::from("type-dependencies.txt"),
        }
    }
}

impl ScanConfig {
    /// Load configuration from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ScanConfig =
            toml::from_str(content).map_err(|e| TypeGraphError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `typedep.toml` in the working directory if it
    /// exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Reject settings the scan cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(TypeGraphError::Config("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(TypeGraphError::Config("queue_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}
