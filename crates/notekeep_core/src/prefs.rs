//! Flat key/value preference store.
//!
//! # Responsibility
//! - Hold string values under string keys (password, note snapshot).
//! - Commit every write to disk before returning.
//!
//! # Invariants
//! - The backing file is replaced atomically; readers never observe a
//!   half-written file.
//! - In-memory stores never touch the filesystem.

use log::{debug, error};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub type PrefsResult<T> = Result<T, PrefsError>;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to access preference file `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("preference file `{path}` is not valid: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String preference store, file-backed or in-memory.
#[derive(Debug, Default)]
pub struct Preferences {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Preferences {
    /// Opens the preference file at `path`, starting empty when it does not
    /// exist yet.
    pub fn open(path: impl Into<PathBuf>) -> PrefsResult<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| PrefsError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(PrefsError::Io { path, source }),
        };

        debug!(
            "event=prefs_open module=prefs status=ok keys={}",
            values.len()
        );
        Ok(Self {
            path: Some(path),
            values,
        })
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stores `value` under `key` and commits.
    ///
    /// On commit failure the in-memory value is rolled back.
    pub fn put_string(&mut self, key: &str, value: impl Into<String>) -> PrefsResult<()> {
        let previous = self.values.insert(key.to_string(), value.into());
        self.commit_or_restore(key, previous)
    }

    /// Removes `key` and commits. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> PrefsResult<()> {
        match self.values.remove(key) {
            Some(previous) => self.commit_or_restore(key, Some(previous)),
            None => Ok(()),
        }
    }

    fn commit_or_restore(&mut self, key: &str, previous: Option<String>) -> PrefsResult<()> {
        if let Err(err) = self.commit() {
            match previous {
                Some(value) => self.values.insert(key.to_string(), value),
                None => self.values.remove(key),
            };
            error!("event=prefs_commit module=prefs status=error key={key} error={err}");
            return Err(err);
        }
        Ok(())
    }

    fn commit(&self) -> PrefsResult<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        let encoded = serde_json::to_vec_pretty(&self.values)?;
        write_atomically(path, &encoded).map_err(|source| PrefsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
