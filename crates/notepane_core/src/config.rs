//! Application configuration.
//!
//! # Responsibility
//! - Hold every path and gateway setting the core needs, passed explicitly
//!   to constructors instead of read from globals.
//! - Provide defaults and resolve relative paths against a base directory.
//!
//! # Invariants
//! - After `resolve_against`, every path is absolute.
//! - The credential file default lives outside the notes directory.

use crate::logging::default_log_level;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default notes directory, relative to the working directory.
pub const DEFAULT_NOTES_DIR: &str = "notes";
/// Default API key file, relative to the working directory.
pub const DEFAULT_KEY_FILE: &str = ".gemini_api_key";
/// Default Gemini REST endpoint.
pub const DEFAULT_GATEWAY_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Gemini model.
pub const DEFAULT_GATEWAY_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);
const APP_DIR_NAME: &str = "notepane";

/// Remote model settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Base URL without trailing slash.
    pub endpoint: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GATEWAY_ENDPOINT.to_string(),
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }
}

/// Full runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub notes_dir: PathBuf,
    pub credential_path: PathBuf,
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    pub gateway: GatewayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from(DEFAULT_NOTES_DIR),
            credential_path: PathBuf::from(DEFAULT_KEY_FILE),
            log_dir: default_log_dir(),
            log_level: default_log_level().to_string(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Makes every relative path absolute by joining it onto `base`.
    pub fn resolve_against(mut self, base: &Path) -> Self {
        self.notes_dir = absolutize(base, self.notes_dir);
        self.credential_path = absolutize(base, self.credential_path);
        self.log_dir = absolutize(base, self.log_dir);
        self.gateway.endpoint = self.gateway.endpoint.trim_end_matches('/').to_string();
        self
    }
}

/// Platform log directory (`~/.local/share/notepane/logs` on Linux), or
/// `./logs` when the platform has none.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn absolutize(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
