//! Snapshot note store over the preference file.
//!
//! # Responsibility
//! - Keep the whole note collection as one JSON array under a single
//!   preference key.
//!
//! # Invariants
//! - Every operation reads the full snapshot; every mutation rewrites it.
//! - A failed write leaves the previously committed snapshot in place.
//! - Ids are the creation time in ms, bumped past the largest existing id.
//! - Single process, single writer only.

use crate::model::note::{sort_by_recency, NewNote, Note, NoteId};
use crate::prefs::Preferences;
use crate::repo::{NoteStore, RepoError, RepoResult};
use log::{debug, info};

/// Preference key holding the encoded note list.
pub const NOTES_KEY: &str = "notes";

/// Note store that persists the full list as one encoded blob.
pub struct SnapshotNoteStore {
    prefs: Preferences,
}

impl SnapshotNoteStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    fn load(&self) -> RepoResult<Vec<Note>> {
        let Some(encoded) = self.prefs.get_string(NOTES_KEY) else {
            return Ok(Vec::new());
        };
        if encoded.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut notes: Vec<Note> = serde_json::from_str(encoded).map_err(|err| {
            RepoError::InvalidData(format!("snapshot under `{NOTES_KEY}` is unreadable: {err}"))
        })?;
        sort_by_recency(&mut notes);
        Ok(notes)
    }

    fn store(&mut self, notes: &[Note]) -> RepoResult<()> {
        let encoded = serde_json::to_string(notes).map_err(|err| {
            RepoError::InvalidData(format!("snapshot could not be encoded: {err}"))
        })?;
        self.prefs.put_string(NOTES_KEY, encoded)?;
        Ok(())
    }
}

impl NoteStore for SnapshotNoteStore {
    fn list_all(&self) -> RepoResult<Vec<Note>> {
        self.load()
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        Ok(self.load()?.into_iter().find(|note| note.id == id))
    }

    fn insert(&mut self, note: &NewNote) -> RepoResult<NoteId> {
        note.validate()?;

        let mut notes = self.load()?;
        let max_id = notes.iter().map(|existing| existing.id).max().unwrap_or(0);
        let id = note.last_modified.max(max_id.saturating_add(1));
        notes.push(note.clone().with_id(id));
        sort_by_recency(&mut notes);
        self.store(&notes)?;

        info!("event=note_insert module=repo backend=snapshot status=ok note_id={id}");
        Ok(id)
    }

    fn update(&mut self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let mut notes = self.load()?;
        let Some(slot) = notes.iter_mut().find(|existing| existing.id == note.id) else {
            return Err(RepoError::NotFound(note.id));
        };
        *slot = note.clone();
        sort_by_recency(&mut notes);
        self.store(&notes)?;

        info!(
            "event=note_update module=repo backend=snapshot status=ok note_id={}",
            note.id
        );
        Ok(())
    }

    fn delete(&mut self, id: NoteId) -> RepoResult<()> {
        let mut notes = self.load()?;
        let before = notes.len();
        notes.retain(|note| note.id != id);
        if notes.len() != before {
            self.store(&notes)?;
        }

        info!(
            "event=note_delete module=repo backend=snapshot status=ok note_id={id} removed={}",
            before - notes.len()
        );
        Ok(())
    }

    fn search(&self, query: &str) -> RepoResult<Vec<Note>> {
        let hits: Vec<Note> = self
            .load()?
            .into_iter()
            .filter(|note| note.matches(query))
            .collect();
        debug!(
            "event=note_search module=repo backend=snapshot status=ok hits={}",
            hits.len()
        );
        Ok(hits)
    }

    fn count(&self) -> RepoResult<u64> {
        Ok(self.load()?.len() as u64)
    }
}
