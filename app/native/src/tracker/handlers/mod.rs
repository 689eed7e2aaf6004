//! Tracker message handlers.
//!
//! Handlers are plain functions over [`TrackerState`] and a [`TrackerEnv`].
//! They run on the actor, one at a time, and read tasks live from the
//! backend on every call.
//!
//! - [`events`]: task-stack events and the pending-launch timeout
//! - [`commands`]: launch, stop and task management operations
//! - [`queries`]: live lookups that do not touch state

pub mod commands;
pub mod events;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};

use super::messages::{TrackerMessage, TrackerNotification};
use crate::config::TrackerConfig;
use crate::platform::{DisplayId, TaskBackend, TaskId};
use crate::shell::ShellExecutor;

pub use commands::{
    clear_display_tasks, force_stop, launch_fullscreen_on_main, launch_on_display,
    move_task_to_back, remove_visible_task, send_to_background,
};
pub use events::{on_event, on_pending_timeout, on_task_changed};
pub use queries::{can_go_back, top_activity};

/// Tunables the handlers read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerSettings {
    pub pending_focus_timeout: Duration,
    pub resizeable_mode: i32,
}

impl From<&TrackerConfig> for TrackerSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            pending_focus_timeout: config.pending_focus_timeout(),
            resizeable_mode: config.resizeable_mode,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self { Self::from(&TrackerConfig::default()) }
}

/// Everything a handler needs besides state.
pub struct TrackerEnv {
    pub backend: Arc<dyn TaskBackend>,
    /// Used for `am force-stop` when the backend refuses.
    pub shell: Option<Arc<dyn ShellExecutor>>,
    pub notifier: broadcast::Sender<TrackerNotification>,
    pub settings: TrackerSettings,
    /// Posts timer messages back to the actor without keeping it alive.
    pub timers: Option<mpsc::WeakSender<TrackerMessage>>,
}

impl TrackerEnv {
    pub(crate) fn notify(&self, notification: TrackerNotification) {
        tracing::debug!(?notification, "tracker notification");
        // No receivers is fine.
        let _ = self.notifier.send(notification);
    }

    /// Focuses a root task, logging failures.
    pub(crate) fn focus_root_task(&self, task_id: TaskId) -> bool {
        match self.backend.set_focused_root_task(task_id) {
            Ok(()) => {
                tracing::debug!(task_id, "focused root task");
                true
            }
            Err(err) => {
                tracing::warn!(task_id, error = %err, "failed to focus root task");
                false
            }
        }
    }

    /// Posts a [`TrackerMessage::PendingTimeout`] after the focus timeout.
    pub(crate) fn schedule_pending_timeout(&self, display_id: DisplayId, package: &str) {
        let Some(sender) = self.timers.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(display_id, package, "no runtime; pending focus timeout not scheduled");
            return;
        };

        let delay = self.settings.pending_focus_timeout;
        let package = package.to_string();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(TrackerMessage::PendingTimeout { display_id, package }).await;
            }
        });
    }
}
