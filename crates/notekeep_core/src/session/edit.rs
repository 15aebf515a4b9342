//! Create/edit session for a single note.
//!
//! # Invariants
//! - Mode is fixed at start: `Create` without a note id, `Edit` with one.
//! - A rejected save hands the session back unchanged; any other failure
//!   ends it.
//! - Cancelling never writes.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::NoteStore;
use crate::service::note_service::{NoteService, NoteServiceError};
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit(NoteId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Created,
    Updated,
}

/// What a finished session hands back to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditResult {
    pub action: EditAction,
    pub note: Note,
}

#[derive(Debug, Error)]
pub enum SaveError {
    /// The draft is blank. The session is still open.
    #[error("save rejected: {error}")]
    Rejected {
        session: EditSession,
        #[source]
        error: NoteValidationError,
    },
    /// The session ended without a result.
    #[error("save failed: {0}")]
    Aborted(#[source] NoteServiceError),
}

impl SaveError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { .. } => "The note is empty".to_string(),
            Self::Aborted(err) => err.user_message(),
        }
    }
}

/// One open create-or-edit interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    mode: EditMode,
    draft: NoteDraft,
}

impl EditSession {
    /// Opens a session; preloads the stored note when `note_id` is given.
    ///
    /// # Errors
    /// - `NoteNotFound` when `note_id` does not exist.
    pub fn start<S: NoteStore>(
        service: &NoteService<S>,
        note_id: Option<NoteId>,
    ) -> Result<Self, NoteServiceError> {
        let session = match note_id {
            None => Self {
                mode: EditMode::Create,
                draft: NoteDraft::default(),
            },
            Some(id) => {
                let note = service
                    .get_note(id)?
                    .ok_or(NoteServiceError::NoteNotFound(id))?;
                Self {
                    mode: EditMode::Edit(id),
                    draft: NoteDraft::new(note.title, note.content),
                }
            }
        };

        debug!("event=edit_start module=session mode={:?}", session.mode);
        Ok(session)
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn content(&self) -> &str {
        &self.draft.content
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
    }

    /// Validates and persists the draft, ending the session.
    pub fn save<S: NoteStore>(self, service: &mut NoteService<S>) -> Result<EditResult, SaveError> {
        if let Err(error) = self.draft.normalize() {
            return Err(SaveError::Rejected {
                session: self,
                error,
            });
        }

        let result = match self.mode {
            EditMode::Create => service.create_note(&self.draft).map(|note| EditResult {
                action: EditAction::Created,
                note,
            }),
            EditMode::Edit(id) => service.update_note(id, &self.draft).map(|note| EditResult {
                action: EditAction::Updated,
                note,
            }),
        }
        .map_err(SaveError::Aborted)?;

        info!(
            "event=edit_save module=session status=ok action={:?} note_id={}",
            result.action, result.note.id
        );
        Ok(result)
    }

    /// Ends the session without writing.
    pub fn cancel(self) {
        debug!("event=edit_cancel module=session mode={:?}", self.mode);
    }
}
