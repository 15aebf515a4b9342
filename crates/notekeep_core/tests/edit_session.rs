use notekeep_core::db::open_db_in_memory;
use notekeep_core::{
    EditAction, EditMode, EditSession, NoteDraft, NoteService, NoteServiceError, NoteStore,
    NotesList, Preferences, SaveError, SnapshotNoteStore, SqliteNoteStore, UNTITLED_NOTE_TITLE,
};

fn sqlite_service() -> NoteService<SqliteNoteStore> {
    NoteService::new(SqliteNoteStore::try_new(open_db_in_memory().unwrap()).unwrap())
}

fn snapshot_service() -> NoteService<SnapshotNoteStore> {
    NoteService::new(SnapshotNoteStore::new(Preferences::in_memory()))
}

fn create_then_edit_blank_title<S: NoteStore>(mut service: NoteService<S>) {
    let mut session = EditSession::start(&service, None).unwrap();
    assert_eq!(session.mode(), EditMode::Create);
    assert_eq!(session.title(), "");
    session.set_title("Groceries");
    session.set_content("milk, eggs");
    let created = session.save(&mut service).unwrap();
    assert_eq!(created.action, EditAction::Created);
    assert_eq!(created.note.title, "Groceries");

    let listed = service.list_notes().unwrap();
    assert_eq!(listed, vec![created.note.clone()]);

    let mut session = EditSession::start(&service, Some(created.note.id)).unwrap();
    assert_eq!(session.mode(), EditMode::Edit(created.note.id));
    assert_eq!(session.title(), "Groceries");
    assert_eq!(session.content(), "milk, eggs");
    session.set_title("");
    session.set_content("milk");
    let updated = session.save(&mut service).unwrap();

    assert_eq!(updated.action, EditAction::Updated);
    assert_eq!(updated.note.id, created.note.id);
    assert_eq!(updated.note.title, UNTITLED_NOTE_TITLE);
    assert_eq!(updated.note.content, "milk");
    assert!(updated.note.last_modified >= created.note.last_modified);

    let stored = service.get_note(created.note.id).unwrap().unwrap();
    assert_eq!(stored, updated.note);
}

fn blank_save_keeps_session_open<S: NoteStore>(mut service: NoteService<S>) {
    let mut session = EditSession::start(&service, None).unwrap();
    session.set_title("   ");

    let err = session.save(&mut service).unwrap_err();
    assert_eq!(err.user_message(), "The note is empty");
    let SaveError::Rejected { mut session, .. } = err else {
        panic!("expected rejected save");
    };
    assert_eq!(service.count_notes().unwrap(), 0);

    session.set_content("second try");
    let saved = session.save(&mut service).unwrap();
    assert_eq!(saved.note.title, UNTITLED_NOTE_TITLE);
    assert_eq!(service.count_notes().unwrap(), 1);
}

fn edit_missing_note_fails_to_start<S: NoteStore>(service: NoteService<S>) {
    let err = EditSession::start(&service, Some(42)).unwrap_err();
    assert!(matches!(err, NoteServiceError::NoteNotFound(42)));
    assert_eq!(err.user_message(), "Note not found");
}

fn edit_of_deleted_note_aborts<S: NoteStore>(mut service: NoteService<S>) {
    let created = service
        .create_note(&NoteDraft::new("short lived", ""))
        .unwrap();
    let mut session = EditSession::start(&service, Some(created.id)).unwrap();
    service.delete_note(created.id).unwrap();

    session.set_content("too late");
    let err = session.save(&mut service).unwrap_err();
    assert!(matches!(
        err,
        SaveError::Aborted(NoteServiceError::NoteNotFound(_))
    ));
    assert_eq!(service.count_notes().unwrap(), 0);
}

fn cancel_writes_nothing<S: NoteStore>(service: NoteService<S>) {
    let mut session = EditSession::start(&service, None).unwrap();
    session.set_title("never saved");
    session.cancel();
    assert!(service.list_notes().unwrap().is_empty());
}

fn list_reflects_session_results<S: NoteStore>(mut service: NoteService<S>) {
    let mut list = NotesList::load(&service).unwrap();
    assert!(list.is_empty());

    let mut session = EditSession::start(&service, None).unwrap();
    session.set_title("first");
    let first = session.save(&mut service).unwrap();
    list.apply(&first);

    let mut session = EditSession::start(&service, None).unwrap();
    session.set_title("second");
    let second = session.save(&mut service).unwrap();
    list.apply(&second);
    assert_eq!(list.len(), 2);

    let mut session = EditSession::start(&service, Some(first.note.id)).unwrap();
    session.set_content("now touched");
    let touched = session.save(&mut service).unwrap();
    list.apply(&touched);
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(first.note.id).unwrap().content, "now touched");

    let mut fresh = NotesList::default();
    fresh.refresh(&service).unwrap();
    assert_eq!(fresh.notes(), list.notes());

    list.delete(&mut service, first.note.id).unwrap();
    assert_eq!(list.len(), 1);
    assert!(service.get_note(first.note.id).unwrap().is_none());

    let rows = list.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "second");
}

fn list_filter_uses_search<S: NoteStore>(mut service: NoteService<S>) {
    service
        .create_note(&NoteDraft::new("Groceries", "milk"))
        .unwrap();
    service
        .create_note(&NoteDraft::new("Work", "slides"))
        .unwrap();

    let mut list = NotesList::default();
    list.filter(&service, "MILK").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.notes()[0].title, "Groceries");
}

macro_rules! session_flows {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            #[test]
            fn create_then_edit() {
                create_then_edit_blank_title($make);
            }

            #[test]
            fn blank_save() {
                blank_save_keeps_session_open($make);
            }

            #[test]
            fn missing_note() {
                edit_missing_note_fails_to_start($make);
            }

            #[test]
            fn deleted_during_edit() {
                edit_of_deleted_note_aborts($make);
            }

            #[test]
            fn cancel() {
                cancel_writes_nothing($make);
            }

            #[test]
            fn list_sync() {
                list_reflects_session_results($make);
            }

            #[test]
            fn list_filter() {
                list_filter_uses_search($make);
            }
        }
    };
}

session_flows!(sqlite, sqlite_service());
session_flows!(snapshot, snapshot_service());
