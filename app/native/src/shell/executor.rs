//! Elevated shell command execution.
//!
//! [`RootShell`] runs commands in two ways:
//!
//! - **Synchronous** ([`ShellExecutor::execute`]): spawns a fresh elevated
//!   shell, writes the command, captures stdout/stderr and waits for exit.
//!   Use it when a definite result is needed (force-stop, task listing).
//! - **Fire-and-forget** ([`ShellExecutor::execute_async`]): enqueues onto a
//!   persistent elevated session drained by a single worker, preserving
//!   submission order without paying a process spawn per command. Use it for
//!   latency-sensitive best-effort actions such as launching into a pane.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use parking_lot::Mutex;

use super::binary::resolve_binary;
use super::session::ShellSession;
use crate::platform::{PlatformError, PlatformResult};

/// Outcome of a synchronous shell command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    /// `true` when the shell exited with status 0.
    pub success: bool,
    /// Exit status, or `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Trimmed standard output.
    pub output: String,
    /// Trimmed standard error.
    pub error: String,
}

impl CommandResult {
    /// Converts a failed result into [`PlatformError::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns `CommandFailed` when the command did not exit successfully.
    pub fn into_output(self, command: &str) -> PlatformResult<String> {
        if self.success {
            Ok(self.output)
        } else {
            Err(PlatformError::CommandFailed {
                command: command.to_string(),
                exit_code: self.exit_code,
                stderr: self.error,
            })
        }
    }
}

/// Something that can run shell commands with elevated privileges.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command and waits for it to exit.
    ///
    /// A non-zero exit is reported through [`CommandResult::success`], not as
    /// an `Err`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Io`] if the shell could not be spawned.
    fn execute(&self, command: &str) -> PlatformResult<CommandResult>;

    /// Queues a command on the persistent session and returns immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if no session could be started.
    fn execute_async(&self, command: &str) -> PlatformResult<()>;

    /// Runs a command and returns its stdout, treating non-zero exit as an error.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::CommandFailed`] on non-zero exit.
    fn run(&self, command: &str) -> PlatformResult<String> {
        self.execute(command)?.into_output(command)
    }

    /// Returns `true` if elevated commands can be run at all.
    fn is_root_available(&self) -> bool {
        self.execute("echo root_check")
            .is_ok_and(|result| result.success && result.output.contains("root_check"))
    }

    /// Asks for elevation and checks that the shell really runs as uid 0.
    ///
    /// On rooted devices this is what triggers the superuser prompt.
    fn request_root(&self) -> bool {
        match self.execute("id") {
            Ok(result) => result.success && result.output.contains("uid=0"),
            Err(err) => {
                tracing::debug!(error = %err, "root request failed");
                false
            }
        }
    }
}

/// Elevated shell backed by a `su`-style binary.
pub struct RootShell {
    binary: String,
    session: Mutex<Option<ShellSession>>,
}

impl RootShell {
    /// Creates a shell that elevates through `binary` (usually `su`).
    #[must_use]
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            session: Mutex::new(None),
        }
    }

    /// The configured shell binary.
    #[must_use]
    pub fn binary(&self) -> &str { &self.binary }

    /// Resolves the configured binary to an absolute path.
    ///
    /// # Errors
    ///
    /// Returns a message if the binary cannot be found.
    pub fn locate(&self) -> Result<PathBuf, String> { resolve_binary(&self.binary) }

    /// Starts the persistent session used by [`ShellExecutor::execute_async`].
    ///
    /// Idempotent. Returns `false` if the session could not be started.
    pub fn init_persistent_session(&self) -> bool {
        let mut session = self.session.lock();
        if session.is_some() {
            return true;
        }
        match ShellSession::start(&self.binary) {
            Ok(started) => {
                *session = Some(started);
                true
            }
            Err(err) => {
                tracing::warn!(binary = %self.binary, error = %err, "failed to start shell session");
                false
            }
        }
    }

    /// Closes the persistent session, waiting for queued commands to drain.
    pub fn shutdown(&self) {
        if let Some(session) = self.session.lock().take() {
            session.shutdown();
        }
    }
}

impl ShellExecutor for RootShell {
    fn execute(&self, command: &str) -> PlatformResult<CommandResult> {
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A shell that exits early closes the pipe; its status still tells us what happened.
            if let Err(err) = stdin.write_all(format!("{command}\nexit\n").as_bytes()) {
                tracing::debug!(command, error = %err, "shell stdin closed early");
            }
        }

        let output = child.wait_with_output()?;
        let result = CommandResult {
            success: output.status.success(),
            exit_code: output.status.code(),
            output: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            error: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };

        if result.success {
            tracing::trace!(command, "shell command succeeded");
        } else {
            tracing::debug!(command, exit_code = ?result.exit_code, stderr = %result.error, "shell command failed");
        }

        Ok(result)
    }

    fn execute_async(&self, command: &str) -> PlatformResult<()> {
        if !self.init_persistent_session() {
            return Err(PlatformError::unavailable("persistent shell session"));
        }
        match self.session.lock().as_ref() {
            Some(session) => session.submit(command),
            None => Err(PlatformError::unavailable("persistent shell session")),
        }
    }
}

impl Drop for RootShell {
    fn drop(&mut self) { self.shutdown(); }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    // `sh` stands in for `su`: both read commands from stdin.
    fn shell() -> RootShell { RootShell::new("sh") }

    #[test]
    fn test_execute_captures_trimmed_output() {
        let result = shell().execute("echo '  hello  '").unwrap();
        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.output, "hello");
        assert!(result.error.is_empty());
    }

    #[test]
    fn test_execute_reports_non_zero_exit() {
        let result = shell().execute("echo oops 1>&2; exit 3").unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.error, "oops");
    }

    #[test]
    fn test_run_maps_failure_to_command_failed() {
        let err = shell().run("exit 1").unwrap_err();
        match err {
            PlatformError::CommandFailed { command, exit_code, .. } => {
                assert_eq!(command, "exit 1");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_execute_missing_binary_is_io_error() {
        let err = RootShell::new("/nonexistent/su").execute("id").unwrap_err();
        assert!(matches!(err, PlatformError::Io(_)));
    }

    #[test]
    fn test_is_root_available_with_working_shell() {
        assert!(shell().is_root_available());
        assert!(!RootShell::new("/nonexistent/su").is_root_available());
    }

    #[test]
    fn test_execute_async_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("order.txt");
        let path = file.display().to_string();

        let shell = shell();
        for i in 0..5 {
            shell.execute_async(&format!("echo {i} >> '{path}'")).unwrap();
        }
        shell.shutdown();

        let contents = std::fs::read_to_string(&file).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_init_persistent_session_is_idempotent() {
        let shell = shell();
        assert!(shell.init_persistent_session());
        assert!(shell.init_persistent_session());
        shell.shutdown();
        // Shutting down twice is harmless.
        shell.shutdown();
        std::thread::sleep(Duration::from_millis(10));
    }

    #[test]
    fn test_command_result_into_output() {
        let ok = CommandResult {
            success: true,
            exit_code: Some(0),
            output: "done".to_string(),
            error: String::new(),
        };
        assert_eq!(ok.into_output("x").unwrap(), "done");
        assert!(CommandResult::default().into_output("x").is_err());
    }
}
