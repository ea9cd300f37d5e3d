//! Domain model for plain-text notes.
//!
//! # Responsibility
//! - Define the note record shared by store, session and shell.
//! - Own the content-derived naming rules for note files.
//!
//! # Invariants
//! - A note is identified by its file name; there is no separate id.
//! - Names derived from content never contain path separators.

pub mod naming;
pub mod note;
