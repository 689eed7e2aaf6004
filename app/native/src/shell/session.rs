//! Persistent elevated shell session.
//!
//! One long-lived shell process is fed commands line by line from a single
//! worker thread. The queue is unbounded and FIFO, so submission order is
//! execution order. If the shell dies the worker respawns it once per failed
//! write and carries on.

use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::platform::thread::spawn_named_thread;
use crate::platform::{PlatformError, PlatformResult};

enum SessionCommand {
    Run(String),
    Shutdown,
}

/// Handle to a running shell session.
pub struct ShellSession {
    sender: mpsc::UnboundedSender<SessionCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ShellSession {
    /// Spawns the shell and its worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the shell process or the worker thread cannot be started.
    pub fn start(binary: &str) -> PlatformResult<Self> {
        let child = spawn_shell(binary)?;
        let (sender, receiver) = mpsc::unbounded_channel();

        let binary = binary.to_string();
        let worker = spawn_named_thread("shell-session", move || {
            run_worker(&binary, child, receiver);
        })
        .ok_or_else(|| PlatformError::unavailable("shell session worker"))?;

        tracing::debug!("persistent shell session started");

        Ok(Self {
            sender,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Queues a command. Returns as soon as it is enqueued.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker has exited.
    pub fn submit(&self, command: &str) -> PlatformResult<()> {
        self.sender
            .send(SessionCommand::Run(command.to_string()))
            .map_err(|_| PlatformError::unavailable("persistent shell session"))
    }

    /// Drains the queue, closes the shell and joins the worker.
    pub fn shutdown(self) {
        let _ = self.sender.send(SessionCommand::Shutdown);
        if let Some(worker) = self.worker.lock().take()
            && worker.join().is_err()
        {
            tracing::error!("shell session worker panicked");
        }
    }
}

fn spawn_shell(binary: &str) -> io::Result<Child> {
    Command::new(binary)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
}

fn write_line(stdin: Option<&mut ChildStdin>, command: &str) -> io::Result<()> {
    let stdin = stdin.ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stdin closed"))?;
    stdin.write_all(command.as_bytes())?;
    stdin.write_all(b"\n")?;
    stdin.flush()
}

fn run_worker(binary: &str, mut child: Child, mut receiver: mpsc::UnboundedReceiver<SessionCommand>) {
    let mut stdin = child.stdin.take();

    while let Some(message) = receiver.blocking_recv() {
        let command = match message {
            SessionCommand::Run(command) => command,
            SessionCommand::Shutdown => break,
        };

        if write_line(stdin.as_mut(), &command).is_ok() {
            tracing::trace!(command = %command, "queued command written to session");
            continue;
        }

        tracing::warn!("shell session died, respawning");
        drop(stdin.take());
        let _ = child.wait();

        match spawn_shell(binary) {
            Ok(mut respawned) => {
                stdin = respawned.stdin.take();
                child = respawned;
                if let Err(err) = write_line(stdin.as_mut(), &command) {
                    tracing::warn!(command = %command, error = %err, "dropping command after respawn");
                }
            }
            Err(err) => {
                tracing::warn!(command = %command, error = %err, "failed to respawn shell session");
            }
        }
    }

    if let Some(mut input) = stdin.take() {
        let _ = input.write_all(b"exit\n");
    }
    let _ = child.wait();
    tracing::debug!("persistent shell session closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_fails_for_missing_binary() {
        assert!(ShellSession::start("/nonexistent/su").is_err());
    }

    #[test]
    fn test_submit_runs_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("session.txt");
        let path = file.display().to_string();

        let session = ShellSession::start("sh").unwrap();
        session.submit(&format!("echo first >> '{path}'")).unwrap();
        session.submit(&format!("echo second >> '{path}'")).unwrap();
        session.shutdown();

        let contents = std::fs::read_to_string(&file).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_session_survives_shell_exit() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("respawn.txt");
        let path = file.display().to_string();

        let session = ShellSession::start("sh").unwrap();
        session.submit("exit 0").unwrap();
        // Give the first shell time to exit so the next write hits a closed pipe.
        std::thread::sleep(std::time::Duration::from_millis(100));
        session.submit(&format!("echo after >> '{path}'")).unwrap();
        session.shutdown();

        let contents = std::fs::read_to_string(&file).unwrap_or_default();
        assert_eq!(contents, "after\n");
    }
}
