//! Notes table schema, stamped into `PRAGMA user_version`.
//!
//! Each entry of `NOTES_SCHEMA` is one revision of the `notes` table. A
//! fresh file gets every revision; an existing file only the ones past its
//! stamp. A file stamped by a newer notekeep is left untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// `(revision, sql)` pairs for the `notes` table, oldest first.
const NOTES_SCHEMA: &[(u32, &str)] = &[(1, include_str!("0001_notes.sql"))];

/// Newest notes schema revision this build can read and write.
pub fn latest_version() -> u32 {
    NOTES_SCHEMA.last().map_or(0, |(revision, _)| *revision)
}

/// Brings the `notes` table up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file carries a newer revision.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stamped = current_user_version(conn)?;
    let latest = latest_version();
    if stamped > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stamped,
            latest_supported: latest,
        });
    }

    let pending: Vec<_> = NOTES_SCHEMA
        .iter()
        .filter(|(revision, _)| *revision > stamped)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (revision, sql) in pending {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", revision)?;
    }
    tx.commit()?;

    let outcome = if stamped == 0 { "created" } else { "upgraded" };
    info!("event=notes_schema module=db status={outcome} revision={latest} previous={stamped}");
    Ok(())
}

/// Notes schema revision stamped on the file; `0` for a fresh database.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
