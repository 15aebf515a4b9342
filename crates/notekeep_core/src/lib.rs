//! Core note storage and session logic for notekeep.
//! This crate is the single source of truth for note invariants.

pub mod app;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod service;
pub mod session;

pub use app::{AppError, DynNoteService, Notebook};
pub use config::{BackendKind, ConfigError, CoreConfig, DEFAULT_PASSWORD};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::note::{NewNote, Note, NoteDraft, NoteId, NoteValidationError, UNTITLED_NOTE_TITLE};
pub use prefs::{Preferences, PrefsError};
pub use repo::snapshot_store::SnapshotNoteStore;
pub use repo::sqlite_store::SqliteNoteStore;
pub use repo::{NoteStore, RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError, ServiceResult};
pub use session::edit::{EditAction, EditMode, EditResult, EditSession, SaveError};
pub use session::gate::{GateError, SessionGate, Unlocked};
pub use session::list::{NoteRow, NotesList};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
