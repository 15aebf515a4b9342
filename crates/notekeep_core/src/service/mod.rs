//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep session controllers and the CLI decoupled from storage details.

pub mod note_service;
