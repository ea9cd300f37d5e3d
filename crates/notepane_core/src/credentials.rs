//! API key persistence.
//!
//! # Responsibility
//! - Read, write and forget the single gateway API key file.
//!
//! # Invariants
//! - The file holds the raw key; surrounding whitespace is ignored on read.
//! - A missing or blank file means "no key".
//! - Key material is never logged.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Credential file error.
#[derive(Debug)]
pub enum CredentialError {
    /// Entered key was empty after trimming.
    EmptyKey,
    Io { path: PathBuf, source: io::Error },
}

impl Display for CredentialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKey => write!(f, "API key cannot be empty"),
            Self::Io { path, source } => {
                write!(f, "API key file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyKey => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// What was found on disk at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoredKey {
    /// Usable key.
    Present(String),
    /// File exists but contains only whitespace.
    Blank,
    /// No file.
    Absent,
}

/// File-backed store for one API key.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inspects the key file.
    pub fn inspect(&self) -> Result<StoredKey, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let key = raw.trim();
                if key.is_empty() {
                    Ok(StoredKey::Blank)
                } else {
                    Ok(StoredKey::Present(key.to_string()))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(StoredKey::Absent),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Returns the key when one is stored.
    pub fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(match self.inspect()? {
            StoredKey::Present(key) => Some(key),
            StoredKey::Blank | StoredKey::Absent => None,
        })
    }

    /// Writes `key` (trimmed), creating parent directories.
    pub fn save(&self, key: &str) -> Result<String, CredentialError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(CredentialError::EmptyKey);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        fs::write(&self.path, key).map_err(|source| self.io_error(source))?;
        restrict_permissions(&self.path);
        info!(
            "event=credential_save module=credentials status=ok path={}",
            self.path.display()
        );
        Ok(key.to_string())
    }

    /// Removes the key file. Absent file is not an error.
    pub fn forget(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(
                    "event=credential_forget module=credentials status=ok path={}",
                    self.path.display()
                );
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(0o600)) {
        warn!(
            "event=credential_save module=credentials status=warn path={} error={}",
            path.display(),
            err
        );
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) {}
