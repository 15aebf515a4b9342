//! SQLite-backed note store.
//!
//! # Responsibility
//! - Map the `NoteStore` contract onto the `notes` table.
//!
//! # Invariants
//! - Ids come from `AUTOINCREMENT` and are never reused after delete.
//! - Each read is a single statement, so callers see a consistent snapshot.
//! - Search input is matched literally; `%`, `_` and `\` are escaped.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::note::{NewNote, Note, NoteId};
use crate::repo::{NoteStore, RepoError, RepoResult};
use log::{debug, info};
use rusqlite::{params, Connection, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    last_modified
FROM notes";

const NOTE_ORDER_SQL: &str = " ORDER BY last_modified DESC, id DESC";

/// Note store over an owned, bootstrapped SQLite connection.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the `notes`
    ///   table shape is wrong.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    fn query_notes(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }
}

impl NoteStore for SqliteNoteStore {
    fn list_all(&self) -> RepoResult<Vec<Note>> {
        self.query_notes(&format!("{NOTE_SELECT_SQL}{NOTE_ORDER_SQL};"), [])
    }

    fn get_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn insert(&mut self, note: &NewNote) -> RepoResult<NoteId> {
        note.validate()?;

        self.conn.execute(
            "INSERT INTO notes (title, content, last_modified) VALUES (?1, ?2, ?3);",
            params![note.title, note.content, note.last_modified],
        )?;
        let id = self.conn.last_insert_rowid();

        info!("event=note_insert module=repo backend=sqlite status=ok note_id={id}");
        Ok(id)
    }

    fn update(&mut self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let changed = self.conn.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                last_modified = ?4
             WHERE id = ?1;",
            params![note.id, note.title, note.content, note.last_modified],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(note.id));
        }

        info!(
            "event=note_update module=repo backend=sqlite status=ok note_id={}",
            note.id
        );
        Ok(())
    }

    fn delete(&mut self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        info!("event=note_delete module=repo backend=sqlite status=ok note_id={id} removed={changed}");
        Ok(())
    }

    fn search(&self, query: &str) -> RepoResult<Vec<Note>> {
        let pattern = format!("%{}%", escape_like(query));
        let notes = self.query_notes(
            &format!(
                "{NOTE_SELECT_SQL}
                 WHERE title LIKE ?1 ESCAPE '\\'
                    OR content LIKE ?1 ESCAPE '\\'{NOTE_ORDER_SQL};"
            ),
            [pattern.as_str()],
        )?;
        debug!(
            "event=note_search module=repo backend=sqlite status=ok hits={}",
            notes.len()
        );
        Ok(notes)
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let note = Note {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        last_modified: row.get("last_modified")?,
    };
    if note.validate().is_err() {
        return Err(RepoError::InvalidData(format!(
            "note {} has empty title and content",
            note.id
        )));
    }
    Ok(note)
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "notes")? {
        return Err(RepoError::MissingRequiredTable("notes"));
    }

    for column in ["id", "title", "content", "last_modified"] {
        if !table_has_column(conn, "notes", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "notes",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
