//! Error types for CarrotPlay.
//!
//! This module provides the application-level error type returned by CLI
//! commands and other one-shot operations. Pane interactions never surface
//! these to the user; they degrade to "nothing happens" instead.

use serde::Serialize;
use thiserror::Error;

use crate::platform::PlatformError;
use crate::tracker::ActorError;

/// Errors that can occur during application execution.
///
/// Serializes as `{ "kind": ..., "message": ... }` so the CLI can emit
/// machine-readable failures with `--json`.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum CarrotError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// IO error.
    #[error("IO error: {0}")]
    IoError(String),
    /// Elevated shell command failed.
    #[error("Shell error: {0}")]
    ShellError(String),
    /// Virtual display operation failed.
    #[error("Display error: {0}")]
    DisplayError(String),
    /// Input injection failed.
    #[error("Input error: {0}")]
    InputError(String),
    /// Task tracking or launch operation failed.
    #[error("Task error: {0}")]
    TaskError(String),
    /// A required capability is not available on this device.
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
    /// Generic command error.
    #[error("{0}")]
    CommandError(String),
}

impl From<std::io::Error> for CarrotError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err.to_string()) }
}

impl From<serde_json::Error> for CarrotError {
    fn from(err: serde_json::Error) -> Self { Self::CommandError(err.to_string()) }
}

impl From<PlatformError> for CarrotError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Unavailable { .. } => Self::Unavailable(err.to_string()),
            PlatformError::CommandFailed { .. } => Self::ShellError(err.to_string()),
            PlatformError::DisplayNotReady { .. } | PlatformError::StaleDisplay { .. } => {
                Self::DisplayError(err.to_string())
            }
            PlatformError::Io(_) => Self::IoError(err.to_string()),
            PlatformError::Rejected { .. } => Self::CommandError(err.to_string()),
        }
    }
}

impl From<ActorError> for CarrotError {
    fn from(err: ActorError) -> Self { Self::TaskError(err.to_string()) }
}

impl From<String> for CarrotError {
    fn from(msg: String) -> Self { Self::CommandError(msg) }
}

impl From<&str> for CarrotError {
    fn from(msg: &str) -> Self { Self::CommandError(msg.to_string()) }
}
