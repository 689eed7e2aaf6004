//! One-time selection of a provider per capability.
//!
//! For each capability the host's privileged provider is probed first; if it
//! is missing or its probe fails, the shell provider is used when an
//! elevated shell is available. The outcome is fixed for the life of the
//! process and logged once.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::backend::{DisplayBackend, InputBackend, TaskBackend};
use super::error::PlatformResult;
use crate::config::CarrotConfig;
use crate::input::{InputInjector, InputRouter, SyncPolicy};
use crate::shell::{ShellExecutor, ShellInput, ShellTaskBackend};

/// Privileged providers supplied by the embedding host.
#[derive(Default, Clone)]
pub struct HostServices {
    pub display: Option<Arc<dyn DisplayBackend>>,
    pub input: Option<Arc<dyn InputBackend>>,
    pub tasks: Option<Arc<dyn TaskBackend>>,
}

impl HostServices {
    /// No privileged providers: everything goes through the shell.
    #[must_use]
    pub fn none() -> Self { Self::default() }
}

/// Which implementation serves a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Provider {
    Privileged,
    Shell,
    Unavailable,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Privileged => "privileged",
            Self::Shell => "shell",
            Self::Unavailable => "unavailable",
        })
    }
}

/// Detection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityReport {
    pub display: Provider,
    pub input: Provider,
    pub tasks: Provider,
    /// `None` when no capability needed the shell, so root was never probed.
    pub root: Option<bool>,
}

/// The providers chosen at startup.
pub struct Capabilities {
    pub display: Option<Arc<dyn DisplayBackend>>,
    pub input: Option<Arc<dyn InputRouter>>,
    pub tasks: Option<Arc<dyn TaskBackend>>,
    pub shell: Arc<dyn ShellExecutor>,
    pub report: CapabilityReport,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities").field("report", &self.report).finish_non_exhaustive()
    }
}

/// Lazily probes root once.
struct RootProbe<'a> {
    shell: &'a dyn ShellExecutor,
    result: Option<bool>,
}

impl RootProbe<'_> {
    fn available(&mut self) -> bool {
        *self.result.get_or_insert_with(|| {
            let available = self.shell.is_root_available();
            if !available {
                tracing::warn!("elevated shell unavailable; shell fallbacks disabled");
            }
            available
        })
    }
}

fn probe_privileged<T: ?Sized>(
    name: &str,
    provider: Option<&Arc<T>>,
    prefer: bool,
    probe: impl FnOnce(&T) -> PlatformResult<()>,
) -> bool {
    let Some(provider) = provider else {
        return false;
    };
    if !prefer {
        tracing::debug!(capability = name, "privileged provider disabled by configuration");
        return false;
    }
    match probe(provider.as_ref()) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(capability = name, error = %err, "privileged provider unavailable, downgrading");
            false
        }
    }
}

impl Capabilities {
    /// Runs detection for every capability.
    #[must_use]
    pub fn detect(host: HostServices, shell: Arc<dyn ShellExecutor>, config: &CarrotConfig) -> Self {
        let prefer = config.shell.prefer_privileged;
        let mut root = RootProbe { shell: shell.as_ref(), result: None };

        // There is no shell way to create a virtual display.
        let (display, display_provider) =
            if probe_privileged("display", host.display.as_ref(), prefer, |b| b.probe()) {
                (host.display.clone(), Provider::Privileged)
            } else {
                (None, Provider::Unavailable)
            };

        let (input, input_provider): (Option<Arc<dyn InputRouter>>, Provider) =
            match host.input.as_ref() {
                Some(backend) if probe_privileged("input", Some(backend), prefer, |b| b.probe()) => (
                    Some(Arc::new(InputInjector::new(
                        Arc::clone(backend),
                        SyncPolicy::from_config(&config.input),
                    ))),
                    Provider::Privileged,
                ),
                _ if root.available() => {
                    (Some(Arc::new(ShellInput::new(Arc::clone(&shell)))), Provider::Shell)
                }
                _ => (None, Provider::Unavailable),
            };

        let (tasks, tasks_provider): (Option<Arc<dyn TaskBackend>>, Provider) =
            if probe_privileged("tasks", host.tasks.as_ref(), prefer, |b| b.probe()) {
                (host.tasks.clone(), Provider::Privileged)
            } else if root.available() {
                let backend =
                    ShellTaskBackend::new(Arc::clone(&shell), config.tracker.poll_interval());
                (Some(Arc::new(backend)), Provider::Shell)
            } else {
                (None, Provider::Unavailable)
            };

        let report = CapabilityReport {
            display: display_provider,
            input: input_provider,
            tasks: tasks_provider,
            root: root.result,
        };

        tracing::info!(
            display = %report.display,
            input = %report.input,
            tasks = %report.tasks,
            root = ?report.root,
            "capabilities detected"
        );

        Self { display, input, tasks, shell, report }
    }
}
