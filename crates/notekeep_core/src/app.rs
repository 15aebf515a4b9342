//! Application wiring.
//!
//! # Responsibility
//! - Open the configured backend and preference store from `CoreConfig`.
//! - Install the gate secret on first run.
//! - Hand out the note service only behind a passed gate.

use crate::config::{BackendKind, ConfigError, CoreConfig};
use crate::db::{open_db, open_db_in_memory, DbError};
use crate::prefs::{Preferences, PrefsError};
use crate::repo::snapshot_store::SnapshotNoteStore;
use crate::repo::sqlite_store::SqliteNoteStore;
use crate::repo::{NoteStore, RepoError};
use crate::service::note_service::NoteService;
use crate::session::gate::{GateError, SessionGate, Unlocked};
use log::info;
use std::path::PathBuf;
use thiserror::Error;

/// Note service over whichever backend the config selected.
pub type DynNoteService = NoteService<Box<dyn NoteStore>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create data directory `{path}`: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error(transparent)]
    Gate(#[from] GateError),
}

/// Opened note storage plus the gate guarding it.
pub struct Notebook {
    backend: BackendKind,
    gate: SessionGate,
    service: DynNoteService,
}

impl Notebook {
    /// Opens files under `config.data_dir`, creating the directory if needed.
    pub fn open(config: &CoreConfig) -> Result<Self, AppError> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir).map_err(|source| AppError::DataDir {
            path: config.data_dir.clone(),
            source,
        })?;

        let prefs = Preferences::open(config.prefs_path())?;
        let store: Box<dyn NoteStore> = match config.backend {
            BackendKind::Sqlite => Box::new(SqliteNoteStore::try_new(open_db(config.sqlite_path())?)?),
            BackendKind::Snapshot => Box::new(SnapshotNoteStore::new(Preferences::open(
                config.snapshot_path(),
            )?)),
        };

        let notebook = Self::assemble(config, prefs, store)?;
        info!(
            "event=notebook_open module=app status=ok backend={:?} mode=file",
            config.backend
        );
        Ok(notebook)
    }

    /// Opens a notebook that never touches the filesystem.
    pub fn open_in_memory(config: &CoreConfig) -> Result<Self, AppError> {
        config.validate()?;
        let store: Box<dyn NoteStore> = match config.backend {
            BackendKind::Sqlite => Box::new(SqliteNoteStore::try_new(open_db_in_memory()?)?),
            BackendKind::Snapshot => Box::new(SnapshotNoteStore::new(Preferences::in_memory())),
        };
        Self::assemble(config, Preferences::in_memory(), store)
    }

    fn assemble(
        config: &CoreConfig,
        prefs: Preferences,
        store: Box<dyn NoteStore>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            backend: config.backend,
            gate: SessionGate::install(prefs, config.default_password.clone())?,
            service: NoteService::new(store),
        })
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    pub fn unlock(&self, input: &str) -> Result<Unlocked, GateError> {
        self.gate.unlock(input)
    }

    pub fn gate_mut(&mut self) -> &mut SessionGate {
        &mut self.gate
    }

    pub fn service(&self, _unlocked: Unlocked) -> &DynNoteService {
        &self.service
    }

    pub fn service_mut(&mut self, _unlocked: Unlocked) -> &mut DynNoteService {
        &mut self.service
    }
}
