//! Session Configuration
//!
//! Every contractual limit of the shell and file system lives in [`Limits`],
//! so that nothing is a hidden constant. [`ShellConfig`] adds the session
//! identity and persistence settings and can be loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const KIB: usize = 1024;
const MIB: usize = 1024 * KIB;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Size and count ceilings enforced before anything commits.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Largest content a single file may hold, in bytes.
    pub max_file_size: usize,
    /// Largest number of entries the file system may hold (root excluded).
    pub max_entries: usize,
    /// Largest persisted snapshot, in bytes after encoding.
    pub max_snapshot_bytes: usize,
    pub max_path_length: usize,
    pub max_pattern_length: usize,
    pub max_command_length: usize,
    pub max_args: usize,
    pub max_pipeline_stages: usize,
    /// Ceiling for one pipe or redirect capture buffer, in bytes.
    pub max_capture_bytes: usize,
    /// Deepest directory nesting `mkdir` will create.
    pub max_directory_depth: usize,
    pub max_history: usize,
    pub fetch_timeout_ms: u64,
    pub max_fetch_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_size: MIB,
            max_entries: 10_000,
            max_snapshot_bytes: 9 * MIB / 2,
            max_path_length: 1024,
            max_pattern_length: 256,
            max_command_length: 8192,
            max_args: 256,
            max_pipeline_stages: 20,
            max_capture_bytes: 512 * KIB,
            max_directory_depth: 100,
            max_history: 500,
            fetch_timeout_ms: 10_000,
            max_fetch_bytes: MIB,
        }
    }
}

/// Session-wide settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub user: String,
    pub hostname: String,
    /// Home directory; defaults to `/home/<user>` when unset.
    pub home: Option<String>,
    /// Pass persisted snapshots through the codec.
    pub compress_snapshots: bool,
    /// Persist to this file instead of memory.
    pub state_file: Option<PathBuf>,
    /// Capacity of the backing store, in bytes.
    pub store_capacity: usize,
    pub limits: Limits,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            hostname: "portfolio".to_string(),
            home: None,
            compress_snapshots: true,
            state_file: None,
            store_capacity: 5 * MIB,
            limits: Limits::default(),
        }
    }
}

impl ShellConfig {
    /// Load a config from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn home_dir(&self) -> String {
        self.home
            .clone()
            .unwrap_or_else(|| format!("/home/{}", self.user))
    }
}
