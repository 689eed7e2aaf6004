//! Task state tracker.
//!
//! The tracker owns the per-display foreground package map and the pending
//! launch correlations. A single actor processes task events and commands,
//! so state has exactly one writer.
//!
//! Task events arrive on their own unbounded queue and are drained before
//! the next command. A listener callback never blocks and never loses an
//! event.
//!
//! Handlers call the task backend synchronously. Backend calls are short
//! binder or shell round trips; the actor's runtime must tolerate them.
//!
//! # Panic Recovery
//!
//! A panicking handler is caught and logged; the actor keeps processing
//! subsequent messages.

mod handle;
pub mod handlers;
mod messages;
pub mod state;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

pub use handle::{ActorError, TrackerHandle};
use handlers::{TrackerEnv, TrackerSettings};
pub use messages::{TrackerMessage, TrackerNotification};
pub use state::{ForegroundMap, TrackerState};
use tokio::sync::{broadcast, mpsc};

use crate::config::TrackerConfig;
use crate::platform::{TaskBackend, TaskEvent};
use crate::shell::{ShellExecutor, ShellTaskBackend};

/// Channel buffer size for the tracker actor.
const CHANNEL_BUFFER_SIZE: usize = 256;

/// Notification channel capacity.
const NOTIFICATION_CAPACITY: usize = 64;

/// Options for spawning a tracker.
#[derive(Clone, Default)]
pub struct TrackerOptions {
    pub config: TrackerConfig,
    /// Elevated shell for `am force-stop` fallback and the polling listener
    /// when the backend's listener cannot be registered.
    pub shell: Option<Arc<dyn ShellExecutor>>,
    /// Skip registering a task listener.
    pub passive: bool,
}

/// The tracker actor.
pub struct TaskTracker {
    state: TrackerState,
    env: TrackerEnv,
    /// Backend the task listener is registered on, if any.
    listener: Option<Arc<dyn TaskBackend>>,
    receiver: mpsc::Receiver<TrackerMessage>,
    events: mpsc::UnboundedReceiver<TaskEvent>,
}

fn register_listener(
    backend: &Arc<dyn TaskBackend>,
    options: &TrackerOptions,
    events: &mpsc::UnboundedSender<TaskEvent>,
) -> Option<Arc<dyn TaskBackend>> {
    match backend.register_listener(handle::event_sink(events.clone())) {
        Ok(()) => {
            tracing::info!("task listener registered");
            return Some(Arc::clone(backend));
        }
        Err(err) => tracing::warn!(error = %err, "task listener unavailable, degrading to polling"),
    }

    let shell = options.shell.as_ref()?;
    let poller: Arc<dyn TaskBackend> =
        Arc::new(ShellTaskBackend::new(Arc::clone(shell), options.config.poll_interval()));
    match poller.register_listener(handle::event_sink(events.clone())) {
        Ok(()) => Some(poller),
        Err(err) => {
            tracing::warn!(error = %err, "polling task listener failed; foreground tracking disabled");
            None
        }
    }
}

impl TaskTracker {
    /// Spawns the actor on the current tokio runtime and returns its handle.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(backend: Arc<dyn TaskBackend>, options: TrackerOptions) -> TrackerHandle {
        tracing::debug!("spawning task tracker");
        let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let (event_sender, events) = mpsc::unbounded_channel();
        let (notifier, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let listener = if options.passive { None } else { register_listener(&backend, &options, &event_sender) };

        let actor = Self {
            state: TrackerState::new(),
            env: TrackerEnv {
                backend,
                shell: options.shell.clone(),
                notifier: notifier.clone(),
                settings: TrackerSettings::from(&options.config),
                timers: Some(sender.downgrade()),
            },
            listener,
            receiver,
            events,
        };

        tokio::spawn(actor.run());

        TrackerHandle::new(sender, event_sender, notifier, options.config.query_timeout())
    }

    async fn run(mut self) {
        tracing::trace!("tracker message loop starting");

        loop {
            let msg = tokio::select! {
                biased;
                Some(event) = self.events.recv() => TrackerMessage::Event(event),
                msg = self.receiver.recv() => match msg {
                    Some(msg) => msg,
                    None => break,
                },
            };

            if matches!(msg, TrackerMessage::Shutdown) {
                tracing::debug!("tracker received shutdown message");
                break;
            }

            let msg_name = msg.name();
            let result = catch_unwind(AssertUnwindSafe(|| {
                self.handle_message(msg);
            }));

            if let Err(panic_info) = result {
                let panic_msg = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());

                tracing::error!(msg = msg_name, panic = %panic_msg, "tracker handler panicked; continuing");
            }
        }

        stop_listening(&mut self.listener);
        self.state.clear();
        tracing::debug!("tracker exited");
    }

    fn handle_message(&mut self, msg: TrackerMessage) {
        let state = &mut self.state;
        let env = &self.env;

        match msg {
            TrackerMessage::Event(event) => handlers::on_event(state, env, event),
            TrackerMessage::PendingTimeout { display_id, package } => {
                handlers::on_pending_timeout(state, env, display_id, &package);
            }

            TrackerMessage::Launch { package, display_id, respond_to } => {
                respond(respond_to, handlers::launch_on_display(state, env, &package, display_id));
            }
            TrackerMessage::LaunchFullscreen { package, display_id, respond_to } => {
                respond(respond_to, handlers::launch_fullscreen_on_main(state, env, &package, display_id));
            }
            TrackerMessage::ForceStop { package, respond_to } => {
                respond(respond_to, handlers::force_stop(state, env, &package));
            }
            TrackerMessage::ClearDisplay { display_id, respond_to } => {
                respond(respond_to, handlers::clear_display_tasks(state, env, display_id));
            }
            TrackerMessage::MoveToBack { display_id, respond_to } => {
                respond(respond_to, handlers::move_task_to_back(env, display_id));
            }
            TrackerMessage::RemoveVisible { display_id, respond_to } => {
                respond(respond_to, handlers::remove_visible_task(state, env, display_id));
            }
            TrackerMessage::SendToBackground { display_id, respond_to } => {
                respond(respond_to, handlers::send_to_background(env, display_id));
            }

            TrackerMessage::TopActivity { display_id, respond_to } => {
                respond(respond_to, handlers::top_activity(env, display_id));
            }
            TrackerMessage::CanGoBack { display_id, respond_to } => {
                respond(respond_to, handlers::can_go_back(env, display_id));
            }
            TrackerMessage::Foreground { display_id, respond_to } => {
                respond(respond_to, state.foreground(display_id).map(str::to_string));
            }
            TrackerMessage::Snapshot { respond_to } => respond(respond_to, state.snapshot()),
            TrackerMessage::PendingLaunches { respond_to } => {
                respond(respond_to, state.pending_snapshot());
            }
            TrackerMessage::Subscribe { respond_to } => respond(respond_to, state.subscribe()),

            TrackerMessage::StopListening => stop_listening(&mut self.listener),
            // Handled by the loop.
            TrackerMessage::Shutdown => {}
        }
    }
}

fn stop_listening(listener: &mut Option<Arc<dyn TaskBackend>>) {
    if let Some(listener) = listener.take() {
        match listener.unregister_listener() {
            Ok(()) => tracing::info!("task listener unregistered"),
            Err(err) => tracing::warn!(error = %err, "failed to unregister task listener"),
        }
    }
}

fn respond<T>(respond_to: tokio::sync::oneshot::Sender<T>, value: T) {
    if respond_to.send(value).is_err() {
        tracing::debug!("tracker response dropped (requester gone)");
    }
}
