//! Error types for platform and shell operations.
//!
//! Every capability provider, privileged or shell-based, reports failures
//! through [`PlatformError`]. The variants follow the failure taxonomy the
//! rest of the crate reacts to:
//!
//! - **Unavailable**: the privileged entry point is missing or denied. Detected
//!   once at startup; the capability is downgraded to its fallback provider.
//! - **DisplayNotReady**: an operation arrived before a pane's virtual display
//!   was assigned an id. Callers retry once after a bounded delay.
//! - **StaleDisplay**: the display id was released while the operation was in
//!   flight. Expected during rapid pane reconfiguration; swallowed.
//! - **CommandFailed**: an elevated shell command exited non-zero. Never
//!   retried automatically.

use thiserror::Error;

use super::types::DisplayId;

/// Result type alias for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors reported by capability providers.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The privileged capability is not available in this process.
    #[error("{capability} is unavailable")]
    Unavailable {
        /// Human-readable capability name.
        capability: String,
    },

    /// The pane's virtual display has not been assigned an id yet.
    #[error("display for slot {slot} is not ready")]
    DisplayNotReady {
        /// The pane slot that was addressed.
        slot: u32,
    },

    /// The display id no longer refers to a live virtual display.
    #[error("display {display_id} is no longer valid")]
    StaleDisplay {
        /// The released display id.
        display_id: DisplayId,
    },

    /// An elevated shell command exited unsuccessfully.
    #[error("command `{command}` failed (exit {}): {stderr}", exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandFailed {
        /// The command line that was executed.
        command: String,
        /// Process exit code, or `None` when killed by a signal.
        exit_code: Option<i32>,
        /// Trimmed standard error output.
        stderr: String,
    },

    /// The platform accepted the call but refused the operation.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        /// The operation that was attempted.
        operation: String,
        /// The reason reported by the platform.
        reason: String,
    },

    /// Spawning or talking to a subprocess failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlatformError {
    /// Creates an unavailable-capability error.
    #[must_use]
    pub fn unavailable(capability: impl Into<String>) -> Self {
        Self::Unavailable { capability: capability.into() }
    }

    /// Creates a rejected-operation error.
    #[must_use]
    pub fn rejected(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if the operation may succeed when retried shortly.
    #[must_use]
    pub const fn is_transient(&self) -> bool { matches!(self, Self::DisplayNotReady { .. }) }

    /// Returns `true` if the error refers to a display that has been released.
    #[must_use]
    pub const fn is_stale(&self) -> bool { matches!(self, Self::StaleDisplay { .. }) }

    /// Returns `true` if the capability itself is missing.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool { matches!(self, Self::Unavailable { .. }) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = PlatformError::unavailable("task listener");
        assert_eq!(err.to_string(), "task listener is unavailable");
        assert!(err.is_unavailable());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_display_not_ready_is_transient() {
        let err = PlatformError::DisplayNotReady { slot: 101 };
        assert!(err.is_transient());
        assert!(!err.is_stale());
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn test_stale_display() {
        let err = PlatformError::StaleDisplay { display_id: 9 };
        assert!(err.is_stale());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_command_failed_display_with_exit_code() {
        let err = PlatformError::CommandFailed {
            command: "am stack list".to_string(),
            exit_code: Some(255),
            stderr: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "command `am stack list` failed (exit 255): denied");
    }

    #[test]
    fn test_command_failed_display_without_exit_code() {
        let err = PlatformError::CommandFailed {
            command: "id".to_string(),
            exit_code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("exit signal"));
    }

    #[test]
    fn test_rejected_helper() {
        let err = PlatformError::rejected("setFocusedRootTask", "no such task");
        assert_eq!(err.to_string(), "setFocusedRootTask rejected: no such task");
    }

    #[test]
    fn test_io_from_conversion() {
        let err: PlatformError = std::io::Error::other("pipe closed").into();
        assert!(matches!(err, PlatformError::Io(_)));
    }
}
