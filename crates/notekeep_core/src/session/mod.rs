//! Session controllers: password gate, notes list and edit flow.
//!
//! # Responsibility
//! - Hold per-screen state between user actions.
//! - Route every write through `NoteService`.

pub mod edit;
pub mod gate;
pub mod list;
