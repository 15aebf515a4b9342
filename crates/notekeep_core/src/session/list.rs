//! In-memory notes list and its display rows.
//!
//! # Invariants
//! - `notes` stays ordered by `last_modified DESC, id DESC`.
//! - A finished edit session is reflected without re-reading storage.

use crate::model::note::{sort_by_recency, Note, NoteId};
use crate::repo::NoteStore;
use crate::service::note_service::{NoteService, ServiceResult};
use crate::session::edit::{EditAction, EditResult};
use chrono::{Local, TimeZone};
use log::debug;
use std::fmt::Display;

const PREVIEW_MAX_CHARS: usize = 100;
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One rendered list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: NoteId,
    pub title: String,
    /// Raw content capped at 100 chars, plus `...` when cut.
    pub preview: String,
    /// `dd/MM/yyyy HH:mm`.
    pub modified: String,
}

#[derive(Debug, Clone, Default)]
pub struct NotesList {
    notes: Vec<Note>,
}

impl NotesList {
    /// Reads every note from the service.
    pub fn load<S: NoteStore>(service: &NoteService<S>) -> ServiceResult<Self> {
        let mut list = Self::default();
        list.refresh(service)?;
        Ok(list)
    }

    pub fn refresh<S: NoteStore>(&mut self, service: &NoteService<S>) -> ServiceResult<()> {
        self.notes = service.list_notes()?;
        debug!("event=list_refresh module=session count={}", self.notes.len());
        Ok(())
    }

    /// Replaces the list with notes matching `query`.
    pub fn filter<S: NoteStore>(
        &mut self,
        service: &NoteService<S>,
        query: &str,
    ) -> ServiceResult<()> {
        self.notes = service.search_notes(query)?;
        Ok(())
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// `true` when the empty-state placeholder should be shown.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Reflects a saved edit session into the list.
    pub fn apply(&mut self, result: &EditResult) {
        match result.action {
            EditAction::Created => self.notes.push(result.note.clone()),
            EditAction::Updated => match self.notes.iter_mut().find(|n| n.id == result.note.id) {
                Some(slot) => *slot = result.note.clone(),
                None => self.notes.push(result.note.clone()),
            },
        }
        sort_by_recency(&mut self.notes);
    }

    /// Deletes a note the user has confirmed and drops it from the list.
    pub fn delete<S: NoteStore>(
        &mut self,
        service: &mut NoteService<S>,
        id: NoteId,
    ) -> ServiceResult<()> {
        service.delete_note(id)?;
        self.notes.retain(|note| note.id != id);
        Ok(())
    }

    /// Rows with dates rendered in the local time zone.
    pub fn rows(&self) -> Vec<NoteRow> {
        self.rows_in(&Local)
    }

    pub fn rows_in<Tz>(&self, tz: &Tz) -> Vec<NoteRow>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.notes.iter().map(|note| note_row(note, tz)).collect()
    }
}

fn note_row<Tz>(note: &Note, tz: &Tz) -> NoteRow
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let modified = tz
        .timestamp_millis_opt(note.last_modified)
        .single()
        .map(|at| at.format(DATE_FORMAT).to_string())
        .unwrap_or_default();

    NoteRow {
        id: note.id,
        title: note.title.clone(),
        preview: content_preview(&note.content),
        modified,
    }
}

/// First 100 chars of the raw content, with `...` appended when longer.
pub fn content_preview(content: &str) -> String {
    let mut chars = content.chars();
    let mut preview: String = chars.by_ref().take(PREVIEW_MAX_CHARS).collect();
    if chars.next().is_some() {
        preview.push_str("...");
    }
    preview
}
