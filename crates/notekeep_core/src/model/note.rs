//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its insert-time shape.
//! - Own save-time normalization and the "not both empty" rule.
//!
//! # Invariants
//! - A note is never persisted with both `title` and `content` blank.
//! - `id` is assigned by storage and never reused for another note.
//! - `last_modified` is epoch milliseconds.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Storage-assigned note identifier.
pub type NoteId = i64;

/// Title stored when the user saves a note without one.
pub const UNTITLED_NOTE_TITLE: &str = "Untitled Note";

/// Persisted note record.
///
/// Serialized field names match the snapshot wire format
/// (`id`, `title`, `content`, `lastModified`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds of the last create/update.
    pub last_modified: i64,
}

/// Note fields before storage assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub last_modified: i64,
}

/// Rejection reasons for note writes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteValidationError {
    #[error("note title and content cannot both be empty")]
    EmptyNote,
}

/// User-entered title/content, as typed in an edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Trims both fields, rejects an all-blank draft and fills the default
    /// title.
    ///
    /// # Errors
    /// - `EmptyNote` when title and content are both blank after trimming.
    pub fn normalize(&self) -> Result<NoteDraft, NoteValidationError> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() && content.is_empty() {
            return Err(NoteValidationError::EmptyNote);
        }

        Ok(NoteDraft {
            title: if title.is_empty() {
                UNTITLED_NOTE_TITLE.to_string()
            } else {
                title.to_string()
            },
            content: content.to_string(),
        })
    }
}

impl NewNote {
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(&self.title, &self.content)
    }

    /// Builds the stored record once an id has been assigned.
    pub fn with_id(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
            last_modified: self.last_modified,
        }
    }
}

impl Note {
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(&self.title, &self.content)
    }

    /// Case-insensitive (ASCII) substring match over title or content.
    ///
    /// A blank needle matches every note.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_ascii_lowercase();
        self.title.to_ascii_lowercase().contains(&needle)
            || self.content.to_ascii_lowercase().contains(&needle)
    }
}

fn validate_fields(title: &str, content: &str) -> Result<(), NoteValidationError> {
    if title.trim().is_empty() && content.trim().is_empty() {
        return Err(NoteValidationError::EmptyNote);
    }
    Ok(())
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Sorts notes most recently modified first, newer ids first on ties.
pub fn sort_by_recency(notes: &mut [Note]) {
    notes.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| b.id.cmp(&a.id))
    });
}
