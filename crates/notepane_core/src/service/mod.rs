//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and session transitions into shell commands.
//! - Keep the terminal UI decoupled from storage details.

pub mod note_service;
pub mod session;
