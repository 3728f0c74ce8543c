use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TagError};

/// Default name of the persisted index file inside the store root.
pub const DEFAULT_INDEX_FILE: &str = "repositories.json";

/// Default name of the image graph directory inside the store root.
pub const DEFAULT_GRAPH_DIR: &str = "graph";

/// Number of id characters shown in short image ids.
pub const DEFAULT_SHORT_ID_LEN: usize = 12;

/// Tag store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory holding the index file and the image graph
    pub root: PathBuf,

    /// File name of the persisted repository index
    pub index_file: String,

    /// Directory name of the image graph (one directory per image id)
    pub graph_dir: String,

    /// Log level
    pub log_level: LogLevel,

    /// Length of truncated image ids in listings
    pub short_id_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            graph_dir: DEFAULT_GRAPH_DIR.to_string(),
            log_level: LogLevel::Warn,
            short_id_len: DEFAULT_SHORT_ID_LEN,
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at `root` with every other field defaulted.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a YAML or JSON file (chosen by extension).
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            TagError::ConfigError(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: StoreConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&data)?,
            _ => serde_yaml::from_str(&data)?,
        };

        tracing::debug!(path = %path.display(), root = %config.root.display(), "Loaded store config");
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot describe a usable store.
    pub fn validate(&self) -> Result<()> {
        if self.index_file.is_empty() {
            return Err(TagError::ConfigError("index_file can't be empty".to_string()));
        }
        if self.index_file.contains('/') {
            return Err(TagError::ConfigError(format!(
                "index_file must be a file name, got '{}'",
                self.index_file
            )));
        }
        if self.short_id_len == 0 {
            return Err(TagError::ConfigError(
                "short_id_len must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Full path of the persisted repository index.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Full path of the image graph directory.
    pub fn graph_path(&self) -> PathBuf {
        self.root.join(&self.graph_dir)
    }
}

/// Default store root (`~/.a3s/tags`).
fn default_root() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".a3s"))
        .unwrap_or_else(|| PathBuf::from(".a3s"))
        .join("tags")
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
