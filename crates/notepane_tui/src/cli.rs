//! Command-line flags.
//!
//! Every flag falls back to an environment variable, then to the
//! `AppConfig` default.

use clap::Parser;
use notepane_core::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "notepane",
    version = notepane_core::core_version(),
    about = "Terminal notes with an AI side panel"
)]
pub struct Cli {
    /// Directory holding one `.txt` file per note.
    #[arg(long, env = "NOTEPANE_NOTES_DIR", value_name = "DIR")]
    pub notes_dir: Option<PathBuf>,

    /// File holding the Gemini API key.
    #[arg(long, env = "NOTEPANE_KEY_FILE", value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    #[arg(long, env = "NOTEPANE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NOTEPANE_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Gemini model name, with or without the `models/` prefix.
    #[arg(long, env = "NOTEPANE_MODEL")]
    pub model: Option<String>,

    /// Base URL of the Gemini REST API.
    #[arg(long, env = "NOTEPANE_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Per-query timeout.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Applies the flags over `AppConfig::default()`. Paths stay relative.
    pub fn into_config(self) -> AppConfig {
        let mut config = AppConfig::default();
        if let Some(dir) = self.notes_dir {
            config.notes_dir = dir;
        }
        if let Some(path) = self.key_file {
            config.credential_path = path;
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = dir;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(model) = self.model {
            config.gateway.model = model;
        }
        if let Some(endpoint) = self.endpoint {
            config.gateway.endpoint = endpoint;
        }
        if let Some(secs) = self.timeout_secs {
            config.gateway.timeout = Duration::from_secs(secs);
        }
        config
    }
}
