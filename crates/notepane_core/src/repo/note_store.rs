//! Note store contract, errors and the shared save protocol.
//!
//! # Responsibility
//! - Define primitive storage operations every backend implements.
//! - Implement `create_or_update` once on top of those primitives so every
//!   backend follows the same rename/collision rules.
//!
//! # Invariants
//! - Editing an existing note under a new name renames it; the rename fails
//!   with `NameCollision` when the target exists and nothing is written.
//! - Saving a new note never merges into an existing file: the first free
//!   `name_N.ext` is used instead.

use crate::model::naming::{note_file_name, suffixed_file_name};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Upper bound for collision probing; reaching it means the directory is
/// full of `name_N` files and something else is wrong.
const MAX_SUFFIX_PROBES: u32 = 10_000;

/// Storage error for note operations.
#[derive(Debug)]
pub enum StoreError {
    /// Referenced note does not exist.
    NotFound(String),
    /// Operation would overwrite an existing, unrelated note.
    NameCollision(String),
    /// Name is empty or is not a single path component.
    InvalidName(String),
    /// Underlying filesystem failure.
    Io {
        op: &'static str,
        name: String,
        source: io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "note not found: `{name}`"),
            Self::NameCollision(name) => write!(f, "note `{name}` already exists"),
            Self::InvalidName(name) => write!(f, "invalid note name: `{name}`"),
            Self::Io { op, name, source } => write!(f, "failed to {op} `{name}`: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Storage interface for a flat collection of named text notes.
pub trait NoteStore {
    /// Lists note names sorted lexicographically.
    fn list(&self) -> StoreResult<Vec<String>>;
    /// Reads one note's content.
    fn read(&self, name: &str) -> StoreResult<String>;
    /// Returns whether a note with this exact name exists.
    fn contains(&self, name: &str) -> StoreResult<bool>;
    /// Writes content under `name`, creating or replacing that one entry.
    fn write(&mut self, name: &str, content: &str) -> StoreResult<()>;
    /// Moves `old` to `new`. Fails with `NameCollision` when `new` exists.
    fn rename(&mut self, old: &str, new: &str) -> StoreResult<()>;
    /// Removes one note. Fails with `NotFound` when absent.
    fn delete(&mut self, name: &str) -> StoreResult<()>;

    /// Returns the on-disk location of `name`, when the backend has one.
    fn locate(&self, _name: &str) -> Option<PathBuf> {
        None
    }

    /// Persists `content` under a name derived from `proposed`.
    ///
    /// With `previous` set the existing note is renamed when the name
    /// changes; without it a free name is probed. Returns the final name.
    fn create_or_update(
        &mut self,
        proposed: &str,
        content: &str,
        previous: Option<&str>,
    ) -> StoreResult<String> {
        let target = note_file_name(proposed);
        validate_name(&target)?;

        let final_name = match previous {
            Some(previous) if previous != target => {
                self.rename(previous, &target)?;
                target
            }
            Some(_) => target,
            None => self.free_name(&target)?,
        };

        self.write(&final_name, content)?;
        Ok(final_name)
    }

    /// First name in `target`, `target_1`, `target_2`, … that is not taken.
    fn free_name(&self, target: &str) -> StoreResult<String> {
        if !self.contains(target)? {
            return Ok(target.to_string());
        }
        for counter in 1..=MAX_SUFFIX_PROBES {
            let candidate = suffixed_file_name(target, counter);
            if !self.contains(&candidate)? {
                return Ok(candidate);
            }
        }
        Err(StoreError::NameCollision(target.to_string()))
    }
}

/// Rejects names that are not a single, plain path component.
pub fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\0'])
        || (cfg!(windows) && name.contains('\\'));
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_name, StoreError};

    #[test]
    fn validate_name_accepts_plain_file_names() {
        validate_name("draft.txt").unwrap();
        validate_name("new_note_3.txt").unwrap();
        validate_name(" padded.txt").unwrap();
    }

    #[test]
    fn validate_name_rejects_paths_and_blanks() {
        for bad in ["", "..", ".", "a/b.txt", "nul\0.txt"] {
            let err = validate_name(bad).unwrap_err();
            assert!(matches!(err, StoreError::InvalidName(_)), "accepted `{bad}`");
        }
    }
}
