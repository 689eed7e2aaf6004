//! Shared setup for CLI commands.
//!
//! The CLI has no privileged host, so every capability resolves to its
//! shell provider.

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::config::{self, CarrotConfig, TrackerConfig};
use crate::error::CarrotError;
use crate::input::InputRouter;
use crate::platform::{Capabilities, HostServices, TaskBackend};
use crate::shell::{RootShell, ShellExecutor, ShellInput, ShellTaskBackend};
use crate::tracker::{TaskTracker, TrackerHandle, TrackerOptions};

pub struct CliContext {
    config: &'static CarrotConfig,
    shell: Arc<RootShell>,
}

impl CliContext {
    #[must_use]
    pub fn new() -> Self {
        let config = config::init();
        Self {
            config,
            shell: Arc::new(RootShell::new(config.shell.binary.clone())),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &'static CarrotConfig { self.config }

    #[must_use]
    pub fn shell(&self) -> Arc<dyn ShellExecutor> { Arc::clone(&self.shell) as Arc<dyn ShellExecutor> }

    /// Runs capability detection.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::detect(HostServices::none(), self.shell(), self.config)
    }

    /// The task provider, or an error when no elevated shell is available.
    ///
    /// # Errors
    ///
    /// Returns [`CarrotError::Unavailable`] when tasks cannot be managed.
    pub fn task_backend(&self) -> Result<Arc<dyn TaskBackend>, CarrotError> {
        self.capabilities()
            .tasks
            .ok_or_else(|| CarrotError::Unavailable("task management requires an elevated shell".to_string()))
    }

    /// The shell input path.
    #[must_use]
    pub fn input(&self) -> Arc<dyn InputRouter> { Arc::new(ShellInput::new(self.shell())) }

    /// Spawns a tracker over the shell task provider on the current runtime.
    ///
    /// One-shot commands run it passive; `watch` registers the polling
    /// listener at `tracker.pollIntervalMs`.
    ///
    /// # Errors
    ///
    /// Returns [`CarrotError::Unavailable`] without an elevated shell.
    pub fn tracker(&self, tracker: TrackerConfig, passive: bool) -> Result<TrackerHandle, CarrotError> {
        if !self.shell.is_root_available() {
            return Err(CarrotError::Unavailable("task tracking requires an elevated shell".to_string()));
        }
        let backend: Arc<dyn TaskBackend> =
            Arc::new(ShellTaskBackend::new(self.shell(), tracker.poll_interval()));
        let options = TrackerOptions { config: tracker, shell: Some(self.shell()), passive };
        Ok(TaskTracker::spawn(backend, options))
    }

    /// A single-threaded runtime for async commands.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the runtime cannot be built.
    pub fn runtime() -> Result<Runtime, CarrotError> {
        Ok(tokio::runtime::Builder::new_current_thread().enable_all().build()?)
    }
}

impl Default for CliContext {
    fn default() -> Self { Self::new() }
}

impl Drop for CliContext {
    fn drop(&mut self) { self.shell.shutdown(); }
}
