//! Editing session state machine.
//!
//! # Responsibility
//! - Track which note is open, the edit buffer, and unsaved changes.
//!
//! # Invariants
//! - `Empty` always has an empty buffer and is clean.
//! - `dirty` only becomes `true` through `edit` with different text.
//! - Only `mark_saved` moves `EditingNew` to `EditingExisting`.

/// Session lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No note open, buffer empty.
    Empty,
    /// Buffer holds a draft with no backing note yet.
    EditingNew,
    /// Buffer is bound to the persisted note `name`.
    EditingExisting { name: String },
}

/// Process-local editing session.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    buffer: String,
    dirty: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::Empty,
            buffer: String::new(),
            dirty: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Name of the open note, `None` for drafts and the empty session.
    pub fn current_note(&self) -> Option<&str> {
        match &self.state {
            SessionState::EditingExisting { name } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Starts an empty draft.
    pub fn new_note(&mut self) {
        self.state = SessionState::EditingNew;
        self.buffer.clear();
        self.dirty = false;
    }

    /// Binds the buffer to a note just loaded from the store.
    pub fn open(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.state = SessionState::EditingExisting { name: name.into() };
        self.buffer = content.into();
        self.dirty = false;
    }

    /// Replaces the buffer with user-edited text.
    ///
    /// Typing into an empty session starts a draft.
    pub fn edit(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.buffer {
            return;
        }
        if self.state == SessionState::Empty {
            self.state = SessionState::EditingNew;
        }
        self.buffer = text;
        self.dirty = true;
    }

    /// Records a successful save under the name assigned by the store.
    pub fn mark_saved(&mut self, name: impl Into<String>) {
        self.state = SessionState::EditingExisting { name: name.into() };
        self.dirty = false;
    }

    /// Follows an external rename of the open note. Dirty state is kept.
    pub fn rebind(&mut self, old: &str, new: impl Into<String>) -> bool {
        if self.current_note() != Some(old) {
            return false;
        }
        self.state = SessionState::EditingExisting { name: new.into() };
        true
    }

    /// Drops the open note when `name` was deleted. Returns whether it was open.
    pub fn close_if_open(&mut self, name: &str) -> bool {
        if self.current_note() != Some(name) {
            return false;
        }
        self.reset();
        true
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Empty;
        self.buffer.clear();
        self.dirty = false;
    }
}
