//! Note storage contracts and implementations.
//!
//! # Responsibility
//! - Define the `NoteStore` contract used by services and the shell.
//! - Provide a flat-directory implementation and an in-memory double.
//!
//! # Invariants
//! - A store never overwrites an unrelated note: renames onto an existing
//!   name fail with `NameCollision`, new notes get a numeric suffix.
//! - `list()` is always re-read and lexicographically sorted.
//! - Names are validated as single path components before any I/O.

pub mod fs_store;
pub mod memory_store;
pub mod note_store;
