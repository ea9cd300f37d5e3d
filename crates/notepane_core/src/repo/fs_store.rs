//! Flat-directory note store.
//!
//! # Responsibility
//! - Map each note to one regular file inside a single directory.
//! - Emit metadata-only `store_*` logging events.
//!
//! # Invariants
//! - Only regular files directly inside `root` are listed; subdirectories
//!   and non-UTF-8 names are skipped.
//! - The directory is created on construction and again before writes.
//! - Note content never appears in log lines.

use super::note_store::{validate_name, NoteStore, StoreError, StoreResult};
use log::{debug, error, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `NoteStore` backed by one directory on disk.
#[derive(Debug, Clone)]
pub struct FsNoteStore {
    root: PathBuf,
}

impl FsNoteStore {
    /// Opens (and creates when absent) the notes directory.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| {
            error!(
                "event=store_open module=store status=error dir={} error={}",
                root.display(),
                source
            );
            StoreError::Io {
                op: "create notes directory",
                name: root.display().to_string(),
                source,
            }
        })?;
        info!(
            "event=store_open module=store status=ok dir={}",
            root.display()
        );
        Ok(Self { root })
    }

    /// Directory holding the notes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> StoreResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn ensure_root(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            op: "create notes directory",
            name: self.root.display().to_string(),
            source,
        })
    }
}

impl NoteStore for FsNoteStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    op: "list",
                    name: self.root.display().to_string(),
                    source,
                })
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                op: "list",
                name: self.root.display().to_string(),
                source,
            })?;
            let is_file = entry.file_type().map(|kind| kind.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }
            // Listed names must stay addressable by read/rename/delete.
            match entry.file_name().into_string() {
                Ok(name) if validate_name(&name).is_ok() => names.push(name),
                _ => {}
            }
        }
        names.sort();
        debug!("event=store_list module=store status=ok count={}", names.len());
        Ok(names)
    }

    fn read(&self, name: &str) -> StoreResult<String> {
        let path = self.path_of(name)?;
        fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io {
                op: "read",
                name: name.to_string(),
                source,
            },
        })
    }

    fn contains(&self, name: &str) -> StoreResult<bool> {
        let path = self.path_of(name)?;
        // `symlink_metadata` so a dangling link still counts as taken.
        match fs::symlink_metadata(&path) {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                op: "inspect",
                name: name.to_string(),
                source,
            }),
        }
    }

    fn write(&mut self, name: &str, content: &str) -> StoreResult<()> {
        let path = self.path_of(name)?;
        self.ensure_root()?;
        fs::write(&path, content).map_err(|source| {
            error!(
                "event=store_write module=store status=error name={} error={}",
                name, source
            );
            StoreError::Io {
                op: "write",
                name: name.to_string(),
                source,
            }
        })?;
        info!(
            "event=store_write module=store status=ok name={} bytes={}",
            name,
            content.len()
        );
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> StoreResult<()> {
        let old_path = self.path_of(old)?;
        let new_path = self.path_of(new)?;
        if !self.contains(old)? {
            return Err(StoreError::NotFound(old.to_string()));
        }
        if old == new {
            return Ok(());
        }
        if self.contains(new)? {
            info!(
                "event=store_rename module=store status=rejected from={} to={} reason=collision",
                old, new
            );
            return Err(StoreError::NameCollision(new.to_string()));
        }
        fs::rename(&old_path, &new_path).map_err(|source| {
            error!(
                "event=store_rename module=store status=error from={} to={} error={}",
                old, new, source
            );
            StoreError::Io {
                op: "rename",
                name: old.to_string(),
                source,
            }
        })?;
        info!(
            "event=store_rename module=store status=ok from={} to={}",
            old, new
        );
        Ok(())
    }

    fn delete(&mut self, name: &str) -> StoreResult<()> {
        let path = self.path_of(name)?;
        fs::remove_file(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io {
                op: "delete",
                name: name.to_string(),
                source,
            },
        })?;
        info!("event=store_delete module=store status=ok name={}", name);
        Ok(())
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.path_of(name).ok()
    }
}
