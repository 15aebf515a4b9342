//! Note storage contract and its backends.
//!
//! # Responsibility
//! - Define the CRUD contract every note backend satisfies.
//! - Isolate SQL and snapshot encoding details from the service layer.
//!
//! # Invariants
//! - Write paths call `validate()` before mutating storage.
//! - `list_all` and `search` return notes by `last_modified DESC, id DESC`.
//! - `delete` is idempotent; `update` of an absent id is `NotFound`.

use crate::db::DbError;
use crate::model::note::{NewNote, Note, NoteId, NoteValidationError};
use crate::prefs::PrefsError;
use thiserror::Error;

pub mod snapshot_store;
pub mod sqlite_store;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] NoteValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Prefs(#[from] PrefsError),
    #[error("note not found: {0}")]
    NotFound(NoteId),
    #[error("invalid persisted note data: {0}")]
    InvalidData(String),
    #[error("connection schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract shared by the SQLite and snapshot backends.
pub trait NoteStore {
    /// Returns every note, most recently modified first.
    fn list_all(&self) -> RepoResult<Vec<Note>>;
    /// Returns `None` when no note has this id.
    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Persists a new note and returns its assigned id.
    fn insert(&mut self, note: &NewNote) -> RepoResult<NoteId>;
    /// Replaces title, content and `last_modified` of an existing note.
    fn update(&mut self, note: &Note) -> RepoResult<()>;
    /// Removes a note. Deleting an absent id succeeds.
    fn delete(&mut self, id: NoteId) -> RepoResult<()>;
    /// Substring match over title or content, ASCII case-insensitive.
    fn search(&self, query: &str) -> RepoResult<Vec<Note>>;
    fn count(&self) -> RepoResult<u64>;
}

impl<S: NoteStore + ?Sized> NoteStore for Box<S> {
    fn list_all(&self) -> RepoResult<Vec<Note>> {
        (**self).list_all()
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        (**self).get_by_id(id)
    }

    fn insert(&mut self, note: &NewNote) -> RepoResult<NoteId> {
        (**self).insert(note)
    }

    fn update(&mut self, note: &Note) -> RepoResult<()> {
        (**self).update(note)
    }

    fn delete(&mut self, id: NoteId) -> RepoResult<()> {
        (**self).delete(id)
    }

    fn search(&self, query: &str) -> RepoResult<Vec<Note>> {
        (**self).search(query)
    }

    fn count(&self) -> RepoResult<u64> {
        (**self).count()
    }
}
