//! In-memory note store for tests and embedding.

use super::note_store::{validate_name, NoteStore, StoreError, StoreResult};
use std::collections::BTreeMap;

/// `NoteStore` kept entirely in a sorted map.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    notes: BTreeMap<String, String>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with `(name, content)` pairs.
    pub fn with_notes<I, N, C>(notes: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            notes: notes
                .into_iter()
                .map(|(name, content)| (name.into(), content.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl NoteStore for MemoryNoteStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.notes.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        validate_name(name)?;
        self.notes
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        validate_name(name)?;
        Ok(self.notes.contains_key(name))
    }

    fn write(&mut self, name: &str, content: &str) -> StoreResult<()> {
        validate_name(name)?;
        self.notes.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> StoreResult<()> {
        validate_name(old)?;
        validate_name(new)?;
        if !self.notes.contains_key(old) {
            return Err(StoreError::NotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if self.notes.contains_key(new) {
            return Err(StoreError::NameCollision(new.to_string()));
        }
        if let Some(content) = self.notes.remove(old) {
            self.notes.insert(new.to_string(), content);
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        validate_name(name)?;
        self.notes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
