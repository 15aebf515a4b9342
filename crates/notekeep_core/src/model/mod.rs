//! Note domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by both storage backends.
//!
//! # Invariants
//! - Every persisted note is identified by a storage-assigned `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;
