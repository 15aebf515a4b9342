//! Startup configuration.
//!
//! # Responsibility
//! - Describe where data lives, which backend stores notes, and the gate
//!   secret installed on first run.
//! - Load/save the TOML config file.
//!
//! # Invariants
//! - Configuration is passed explicitly; there is no process-global copy.
//! - `validate()` passes before any store is opened.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Gate secret installed when the preference store has none.
pub const DEFAULT_PASSWORD: &str = "1234";

const SQLITE_FILE_NAME: &str = "notes.sqlite3";
const PREFS_FILE_NAME: &str = "prefs.json";
const SNAPSHOT_FILE_NAME: &str = "notes_snapshot.json";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Note storage strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Durable SQLite table with indexed queries.
    #[default]
    Sqlite,
    /// Whole list encoded under one key of the preference file.
    Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub default_password: String,
    pub log_level: String,
    /// Defaults to `<data_dir>/logs`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".notekeep"),
            backend: BackendKind::default(),
            default_password: DEFAULT_PASSWORD.to_string(),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Default settings rooted at `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Loads and validates a TOML config file. Missing keys take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, text).map_err(io_err)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir cannot be empty".to_string()));
        }
        if self.default_password.is_empty() {
            return Err(ConfigError::Invalid(
                "default_password cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(SQLITE_FILE_NAME)
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(PREFS_FILE_NAME)
    }

    /// Preference file holding the note snapshot (snapshot backend only).
    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(SNAPSHOT_FILE_NAME)
    }

    pub fn resolved_log_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join(LOG_DIR_NAME))
    }
}
