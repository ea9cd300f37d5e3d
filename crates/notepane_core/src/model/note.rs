//! Note domain record.
//!
//! # Responsibility
//! - Describe one persisted text document as handed to the shell.
//!
//! # Invariants
//! - Drafts are not `Note`s; unsaved text lives in the session buffer.
//! - Name uniqueness is enforced by the store, not by this type.

use std::path::PathBuf;

/// One plain-text document read from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// File name inside the notes directory (`Groceries.txt`).
    pub name: String,
    /// Full text as stored.
    pub content: String,
    /// Location on disk. `None` for in-memory stores.
    pub path: Option<PathBuf>,
}

impl Note {
    pub fn persisted(
        name: impl Into<String>,
        content: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            path,
        }
    }

    /// Size of the content in bytes.
    pub fn size_bytes(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::Note;
    use std::path::PathBuf;

    #[test]
    fn persisted_keeps_name_path_and_size() {
        let note = Note::persisted("a.txt", "héllo", Some(PathBuf::from("notes/a.txt")));
        assert_eq!(note.name, "a.txt");
        assert_eq!(note.path, Some(PathBuf::from("notes/a.txt")));
        assert_eq!(note.size_bytes(), 6);
    }
}
