//! Note use-case service.
//!
//! # Responsibility
//! - Own the store and the editing session behind one command surface
//!   (list, open, new, edit, save, delete, rename).
//! - Derive save names from the first line of the buffer.
//! - Convert outcomes into `ActionReport`s for status display.
//!
//! # Invariants
//! - A blank buffer is never persisted.
//! - A failed save leaves the session untouched: same binding, same buffer,
//!   still dirty.
//! - Deleting the open note resets the session to `Empty`.

use crate::model::naming::{note_file_name, proposed_file_name};
use crate::model::note::Note;
use crate::repo::note_store::{NoteStore, StoreError};
use crate::service::session::Session;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Buffer is empty or whitespace only.
    EmptySave,
    /// Operation needs an open, persisted note.
    NoOpenNote,
    /// Target note does not exist.
    NotFound(String),
    /// Operation would overwrite another note.
    NameCollision(String),
    /// Any other persistence-layer failure.
    Store(StoreError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySave => write!(f, "Cannot save an empty note."),
            Self::NoOpenNote => write!(f, "No saved note is open."),
            Self::NotFound(name) => write!(f, "Note '{name}' does not exist."),
            Self::NameCollision(name) => write!(f, "Note '{name}' already exists."),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for NoteServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(name) => Self::NotFound(name),
            StoreError::NameCollision(name) => Self::NameCollision(name),
            other => Self::Store(other),
        }
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Name the note is stored under now.
    pub name: String,
    /// Previous name when the save renamed the note.
    pub renamed_from: Option<String>,
    /// Whether this save created a new note.
    pub created: bool,
}

/// User-facing envelope for shell commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Note the operation ended on, when there is one.
    pub note_name: Option<String>,
    /// Status text for the footer.
    pub message: String,
}

impl ActionReport {
    fn success(message: impl Into<String>, note_name: Option<String>) -> Self {
        Self {
            ok: true,
            note_name,
            message: message.into(),
        }
    }

    fn failure(err: &NoteServiceError) -> Self {
        Self {
            ok: false,
            note_name: None,
            message: err.to_string(),
        }
    }
}

/// Note service facade over a store and the current session.
pub struct NoteService<S: NoteStore> {
    store: S,
    session: Session,
}

impl<S: NoteStore> NoteService<S> {
    /// Creates a service with an empty session.
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Session::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Lists note names, re-reading the store.
    pub fn list_notes(&self) -> Result<Vec<String>, NoteServiceError> {
        Ok(self.store.list()?)
    }

    /// Loads `name` into the session and returns the note.
    ///
    /// On failure the current session is left as it was.
    pub fn open_note(&mut self, name: &str) -> Result<Note, NoteServiceError> {
        let content = self.store.read(name)?;
        self.session.open(name, content.clone());
        let note = Note::persisted(name, content, self.store.locate(name));
        info!(
            "event=note_open module=service status=ok name={} size_bytes={}",
            note.name,
            note.size_bytes()
        );
        Ok(note)
    }

    /// Starts an empty draft.
    pub fn new_note(&mut self) {
        self.session.new_note();
    }

    /// Replaces the session buffer with edited text.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.session.edit(text);
    }

    /// Persists the buffer under a name derived from its first line.
    pub fn save(&mut self) -> Result<SaveOutcome, NoteServiceError> {
        let content = self.session.buffer();
        if content.is_empty() {
            return Err(NoteServiceError::EmptySave);
        }

        let proposed = proposed_file_name(content);
        let previous = self.session.current_note().map(str::to_string);
        let name = match self
            .store
            .create_or_update(&proposed, content, previous.as_deref())
        {
            Ok(name) => name,
            Err(err) => {
                warn!(
                    "event=note_save module=service status=error proposed={} error={}",
                    proposed, err
                );
                return Err(err.into());
            }
        };

        self.session.mark_saved(name.clone());
        info!(
            "event=note_save module=service status=ok name={} created={}",
            name,
            previous.is_none()
        );
        Ok(SaveOutcome {
            renamed_from: previous.clone().filter(|old| *old != name),
            created: previous.is_none(),
            name,
        })
    }

    /// Deletes `name`. Returns whether it was the open note.
    pub fn delete_note(&mut self, name: &str) -> Result<bool, NoteServiceError> {
        self.store.delete(name)?;
        let closed = self.session.close_if_open(name);
        info!(
            "event=note_delete module=service status=ok name={} closed_open={}",
            name, closed
        );
        Ok(closed)
    }

    /// Renames `old` to `new` (default extension added when missing).
    ///
    /// Returns the final name. The open note follows the rename.
    pub fn rename_note(&mut self, old: &str, new: &str) -> Result<String, NoteServiceError> {
        let target = note_file_name(new.trim());
        self.store.rename(old, &target)?;
        self.session.rebind(old, target.clone());
        info!(
            "event=note_rename module=service status=ok from={} to={}",
            old, target
        );
        Ok(target)
    }

    /// Renames the note currently open in the session.
    pub fn rename_open(&mut self, new: &str) -> Result<String, NoteServiceError> {
        let old = self
            .session
            .current_note()
            .map(str::to_string)
            .ok_or(NoteServiceError::NoOpenNote)?;
        self.rename_note(&old, new)
    }

    /// `save` with the outcome converted to status text.
    pub fn request_save(&mut self) -> ActionReport {
        match self.save() {
            Ok(outcome) => ActionReport::success(
                format!("Note saved: {}", outcome.name),
                Some(outcome.name),
            ),
            Err(err) => ActionReport::failure(&err),
        }
    }

    /// `delete_note` with the outcome converted to status text.
    pub fn request_delete(&mut self, name: &str) -> ActionReport {
        match self.delete_note(name) {
            Ok(_) => ActionReport::success(
                format!("Note '{name}' deleted."),
                self.session.current_note().map(str::to_string),
            ),
            Err(err) => ActionReport::failure(&err),
        }
    }

    /// `rename_open` with the outcome converted to status text.
    ///
    /// `None` (prompt cancelled) and an unchanged name are no-ops.
    pub fn request_rename(&mut self, new: Option<&str>) -> Option<ActionReport> {
        let new = new.map(str::trim).filter(|value| !value.is_empty())?;
        if self.session.current_note() == Some(new) {
            return None;
        }
        Some(match self.rename_open(new) {
            Ok(name) => ActionReport::success(format!("Note renamed to: {name}"), Some(name)),
            Err(err) => ActionReport::failure(&err),
        })
    }
}
