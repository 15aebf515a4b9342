//! Note use-case service.
//!
//! # Responsibility
//! - Forward list/get/search/delete calls to the configured store.
//! - Normalize and validate drafts before they reach storage.
//! - Stamp `last_modified` on every create and update.
//!
//! # Invariants
//! - A draft with blank title and blank content never reaches the store.
//! - Updates are full replacements; `last_modified` never moves backwards.

use crate::model::note::{now_epoch_ms, NewNote, Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::{NoteStore, RepoError};
use log::warn;
use thiserror::Error;

/// Service error for note use-cases.
#[derive(Debug, Error)]
pub enum NoteServiceError {
    #[error(transparent)]
    Validation(#[from] NoteValidationError),
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("storage failure: {0}")]
    Storage(RepoError),
    /// Write succeeded but the read-back did not return the row.
    #[error("inconsistent note state: {0}")]
    InconsistentState(&'static str),
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl NoteServiceError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(_) => "The note is empty".to_string(),
            Self::NoteNotFound(_) => "Note not found".to_string(),
            Self::Storage(err) => format!("Error saving note: {err}"),
            Self::InconsistentState(_) => "Error saving note".to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, NoteServiceError>;

/// Note service facade over a storage backend.
pub struct NoteService<S: NoteStore> {
    store: S,
}

impl<S: NoteStore> NoteService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists all notes, most recently modified first.
    pub fn list_notes(&self) -> ServiceResult<Vec<Note>> {
        Ok(self.store.list_all()?)
    }

    /// Gets one note; `None` when absent.
    pub fn get_note(&self, id: NoteId) -> ServiceResult<Option<Note>> {
        Ok(self.store.get_by_id(id)?)
    }

    /// Creates a note from a draft and returns the stored record.
    pub fn create_note(&mut self, draft: &NoteDraft) -> ServiceResult<Note> {
        let normalized = draft.normalize().inspect_err(|_| {
            warn!("event=note_save module=service mode=create status=rejected error_code=empty_note");
        })?;

        let new_note = NewNote {
            title: normalized.title,
            content: normalized.content,
            last_modified: now_epoch_ms(),
        };
        let id = self.store.insert(&new_note)?;
        self.store
            .get_by_id(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title and content of an existing note.
    ///
    /// # Errors
    /// - `Validation` when the draft is blank; nothing is written.
    /// - `NoteNotFound` when `id` does not exist.
    pub fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> ServiceResult<Note> {
        let normalized = draft.normalize().inspect_err(|_| {
            warn!("event=note_save module=service mode=edit status=rejected error_code=empty_note note_id={id}");
        })?;

        let previous = self
            .store
            .get_by_id(id)?
            .ok_or(NoteServiceError::NoteNotFound(id))?;
        let updated = Note {
            id,
            title: normalized.title,
            content: normalized.content,
            last_modified: now_epoch_ms().max(previous.last_modified),
        };
        self.store.update(&updated)?;
        self.store
            .get_by_id(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Deletes a note. Deleting an absent id succeeds.
    pub fn delete_note(&mut self, id: NoteId) -> ServiceResult<()> {
        Ok(self.store.delete(id)?)
    }

    pub fn search_notes(&self, query: &str) -> ServiceResult<Vec<Note>> {
        Ok(self.store.search(query)?)
    }

    pub fn count_notes(&self) -> ServiceResult<u64> {
        Ok(self.store.count()?)
    }
}
