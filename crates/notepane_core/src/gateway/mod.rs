//! Remote language-model gateway.
//!
//! # Responsibility
//! - Define the `QueryGateway` boundary (prompt in, text or error out).
//! - Provide the Gemini HTTP implementation and the background dispatcher
//!   that keeps the blocking call off the interactive thread.
//!
//! # Invariants
//! - Gateway errors are values shown to the user; they never end the session.
//! - Prompts and API keys are not logged.

pub mod dispatch;
pub mod gemini;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Synchronous prompt/response call to a remote model.
pub trait QueryGateway: Send + Sync {
    /// Sends `prompt` and returns the response text.
    fn query(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Gateway and dispatch failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No API key is configured, so the gateway is disabled.
    CredentialMissing,
    /// A query is already in flight.
    Busy,
    /// Request never produced an HTTP response (DNS, TLS, timeout).
    Transport(String),
    /// Remote returned a non-success status.
    Http { status: u16, message: String },
    /// Response parsed but contained no text.
    EmptyResponse,
    /// Response body could not be understood.
    InvalidResponse(String),
    /// Background worker died before reporting.
    WorkerFailed(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CredentialMissing => {
                write!(f, "No API key configured. Press Ctrl+E to enter one.")
            }
            Self::Busy => write!(f, "A query is already running."),
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            Self::EmptyResponse => write!(f, "the model returned an empty response"),
            Self::InvalidResponse(message) => write!(f, "unexpected response: {message}"),
            Self::WorkerFailed(message) => write!(f, "query worker failed: {message}"),
        }
    }
}

impl Error for GatewayError {}
