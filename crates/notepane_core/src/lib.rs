//! Core domain logic for notepane.
//! Owns note naming, storage, the editing session and the model gateway;
//! the terminal shell only renders what this crate returns.

pub mod config;
pub mod credentials;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod repo;
pub mod service;

pub use config::{AppConfig, GatewayConfig};
pub use credentials::{CredentialError, CredentialStore, StoredKey};
pub use gateway::dispatch::{QueryDispatcher, QueryId, QueryOutcome};
pub use gateway::gemini::GeminiGateway;
pub use gateway::{GatewayError, QueryGateway};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::naming::{sanitize, FALLBACK_BASE_NAME, NOTE_EXTENSION};
pub use model::note::Note;
pub use prompt::PromptKind;
pub use repo::fs_store::FsNoteStore;
pub use repo::memory_store::MemoryNoteStore;
pub use repo::note_store::{NoteStore, StoreError, StoreResult};
pub use service::note_service::{ActionReport, NoteService, NoteServiceError, SaveOutcome};
pub use service::session::{Session, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
