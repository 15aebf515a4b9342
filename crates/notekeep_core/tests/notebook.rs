use notekeep_core::session::gate::PASSWORD_KEY;
use notekeep_core::{
    AppError, BackendKind, CoreConfig, EditSession, GateError, NoteDraft, Notebook, Preferences,
};

fn config_in(dir: &std::path::Path, backend: BackendKind) -> CoreConfig {
    let mut config = CoreConfig::with_data_dir(dir.join("data"));
    config.backend = backend;
    config
}

#[test]
fn first_open_installs_default_password() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Sqlite);

    let notebook = Notebook::open(&config).unwrap();
    assert!(notebook.unlock("1234").is_ok());
    assert!(matches!(notebook.unlock("4321"), Err(GateError::WrongPassword)));
    drop(notebook);

    let prefs = Preferences::open(config.prefs_path()).unwrap();
    assert_eq!(prefs.get_string(PASSWORD_KEY), Some("1234"));
}

#[test]
fn injected_default_password_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), BackendKind::Snapshot);
    config.default_password = "open sesame".to_string();

    let notebook = Notebook::open(&config).unwrap();
    assert!(notebook.unlock("open sesame").is_ok());
    assert!(notebook.unlock("1234").is_err());
}

#[test]
fn changed_password_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Sqlite);

    let mut notebook = Notebook::open(&config).unwrap();
    notebook.gate_mut().change_password("1234", "next").unwrap();
    drop(notebook);

    let reopened = Notebook::open(&config).unwrap();
    assert!(reopened.unlock("next").is_ok());
    assert!(reopened.unlock("1234").is_err());
}

#[test]
fn notes_persist_across_reopen_for_both_backends() {
    for backend in [BackendKind::Sqlite, BackendKind::Snapshot] {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), backend);

        let created_id = {
            let mut notebook = Notebook::open(&config).unwrap();
            assert_eq!(notebook.backend(), backend);
            let unlocked = notebook.unlock("1234").unwrap();
            let service = notebook.service_mut(unlocked);
            let mut session = EditSession::start(service, None).unwrap();
            session.set_title("Groceries");
            session.set_content("milk, eggs");
            session.save(service).unwrap().note.id
        };

        let notebook = Notebook::open(&config).unwrap();
        let unlocked = notebook.unlock("1234").unwrap();
        let notes = notebook.service(unlocked).list_notes().unwrap();
        assert_eq!(notes.len(), 1, "backend {backend:?}");
        assert_eq!(notes[0].id, created_id);
        assert_eq!(notes[0].content, "milk, eggs");
    }
}

#[test]
fn backends_write_their_own_files() {
    let dir = tempfile::tempdir().unwrap();

    let sqlite = config_in(dir.path(), BackendKind::Sqlite);
    Notebook::open(&sqlite).unwrap();
    assert!(sqlite.sqlite_path().exists());
    assert!(!sqlite.snapshot_path().exists());

    let snapshot_dir = tempfile::tempdir().unwrap();
    let snapshot = config_in(snapshot_dir.path(), BackendKind::Snapshot);
    let mut notebook = Notebook::open(&snapshot).unwrap();
    let unlocked = notebook.unlock("1234").unwrap();
    notebook
        .service_mut(unlocked)
        .create_note(&NoteDraft::new("", "body only"))
        .unwrap();
    assert!(snapshot.snapshot_path().exists());
    assert!(!snapshot.sqlite_path().exists());
}

#[test]
fn in_memory_notebook_touches_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), BackendKind::Sqlite);

    let mut notebook = Notebook::open_in_memory(&config).unwrap();
    let unlocked = notebook.unlock("1234").unwrap();
    notebook
        .service_mut(unlocked)
        .create_note(&NoteDraft::new("scratch", ""))
        .unwrap();

    assert!(!config.data_dir.exists());
}

#[test]
fn invalid_config_is_rejected_before_opening() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), BackendKind::Sqlite);
    config.default_password.clear();

    assert!(matches!(
        Notebook::open(&config),
        Err(AppError::Config(_))
    ));
    assert!(!config.data_dir.exists());
}
