//! Handle for communicating with the tracker actor.
//!
//! The `TrackerHandle` is cheap to clone and can be shared across threads.
//! Every request waits at most the configured query timeout.

use std::collections::BTreeMap;
use std::time::Duration;

use eyeball::Subscriber;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::messages::{TrackerMessage, TrackerNotification};
use super::state::ForegroundMap;
use crate::platform::{DisplayId, TaskEvent, TaskEventSink};

/// Error types for actor communication.
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
    /// Failed to send message to actor.
    #[error("Failed to send message to tracker: channel closed")]
    SendFailed,

    /// Failed to receive response from actor.
    #[error("Failed to receive response from tracker: channel closed")]
    ReceiveFailed,

    /// Request timed out.
    #[error("Tracker request timed out after {0:?}")]
    Timeout(Duration),
}

/// Handle for communicating with the tracker actor.
#[derive(Clone)]
pub struct TrackerHandle {
    sender: mpsc::Sender<TrackerMessage>,
    events: mpsc::UnboundedSender<TaskEvent>,
    notifier: broadcast::Sender<TrackerNotification>,
    query_timeout: Duration,
}

impl TrackerHandle {
    pub(crate) const fn new(
        sender: mpsc::Sender<TrackerMessage>,
        events: mpsc::UnboundedSender<TaskEvent>,
        notifier: broadcast::Sender<TrackerNotification>,
        query_timeout: Duration,
    ) -> Self {
        Self { sender, events, notifier, query_timeout }
    }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Sends a message without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped or its
    /// queue is full.
    pub fn send(&self, msg: TrackerMessage) -> Result<(), ActorError> {
        self.sender.try_send(msg).map_err(|_| ActorError::SendFailed)
    }

    /// Sends a request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Timeout`] if the actor does not answer within
    /// the query timeout, or a channel error if it has stopped.
    pub async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TrackerMessage,
    ) -> Result<T, ActorError> {
        let (tx, rx) = oneshot::channel();
        let exchange = async {
            self.sender.send(build(tx)).await.map_err(|_| ActorError::SendFailed)?;
            rx.await.map_err(|_| ActorError::ReceiveFailed)
        };
        tokio::time::timeout(self.query_timeout, exchange)
            .await
            .map_err(|_| ActorError::Timeout(self.query_timeout))?
    }

    /// A sink that feeds task events into this actor.
    ///
    /// Delivery never blocks and never drops an event. Once the actor is
    /// gone the sink reports it closed.
    #[must_use]
    pub fn event_sink(&self) -> TaskEventSink {
        event_sink(self.events.clone())
    }

    /// Receives `AppChanged` / `AppClosed` notifications from now on.
    #[must_use]
    pub fn notifications(&self) -> broadcast::Receiver<TrackerNotification> {
        self.notifier.subscribe()
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration { self.query_timeout }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Launches `package` on a pane display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn launch_on_display(&self, package: &str, display_id: DisplayId) -> Result<bool, ActorError> {
        let package = package.to_string();
        self.request(|respond_to| TrackerMessage::Launch { package, display_id, respond_to }).await
    }

    /// Launches `package` fullscreen on the main display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn launch_fullscreen_on_main(
        &self,
        package: &str,
        display_id: DisplayId,
    ) -> Result<bool, ActorError> {
        let package = package.to_string();
        self.request(|respond_to| TrackerMessage::LaunchFullscreen { package, display_id, respond_to })
            .await
    }

    /// Force-stops `package`.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn force_stop(&self, package: &str) -> Result<bool, ActorError> {
        let package = package.to_string();
        self.request(|respond_to| TrackerMessage::ForceStop { package, respond_to }).await
    }

    /// Removes every task on the display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn clear_display_tasks(&self, display_id: DisplayId) -> Result<bool, ActorError> {
        self.request(|respond_to| TrackerMessage::ClearDisplay { display_id, respond_to }).await
    }

    /// Moves the display's visible task to the back.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn move_task_to_back(&self, display_id: DisplayId) -> Result<bool, ActorError> {
        self.request(|respond_to| TrackerMessage::MoveToBack { display_id, respond_to }).await
    }

    /// Removes the display's visible task.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn remove_visible_task(&self, display_id: DisplayId) -> Result<bool, ActorError> {
        self.request(|respond_to| TrackerMessage::RemoveVisible { display_id, respond_to }).await
    }

    /// Backgrounds the display's app.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn send_to_background(&self, display_id: DisplayId) -> Result<bool, ActorError> {
        self.request(|respond_to| TrackerMessage::SendToBackground { display_id, respond_to }).await
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Package of the visible task on the display, read live.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn top_activity(&self, display_id: DisplayId) -> Result<Option<String>, ActorError> {
        self.request(|respond_to| TrackerMessage::TopActivity { display_id, respond_to }).await
    }

    /// Whether BACK would stay inside the display's app.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn can_go_back(&self, display_id: DisplayId) -> Result<bool, ActorError> {
        self.request(|respond_to| TrackerMessage::CanGoBack { display_id, respond_to }).await
    }

    /// The recorded foreground package of the display.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn foreground(&self, display_id: DisplayId) -> Result<Option<String>, ActorError> {
        self.request(|respond_to| TrackerMessage::Foreground { display_id, respond_to }).await
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn snapshot(&self) -> Result<ForegroundMap, ActorError> {
        self.request(|respond_to| TrackerMessage::Snapshot { respond_to }).await
    }

    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn pending_launches(&self) -> Result<BTreeMap<DisplayId, String>, ActorError> {
        self.request(|respond_to| TrackerMessage::PendingLaunches { respond_to }).await
    }

    /// Subscribes to the observable foreground map.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the actor fails.
    pub async fn subscribe(&self) -> Result<Subscriber<ForegroundMap>, ActorError> {
        self.request(|respond_to| TrackerMessage::Subscribe { respond_to }).await
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Unregisters the task listener. Commands keep working.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has stopped.
    pub async fn stop_listening(&self) -> Result<(), ActorError> {
        self.sender.send(TrackerMessage::StopListening).await.map_err(|_| ActorError::SendFailed)
    }

    /// Stops the actor.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::SendFailed`] if the actor has already stopped.
    pub async fn shutdown(&self) -> Result<(), ActorError> {
        self.sender.send(TrackerMessage::Shutdown).await.map_err(|_| ActorError::SendFailed)
    }

    /// Returns `true` once the actor has exited.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.sender.is_closed() }
}

pub(crate) fn event_sink(sender: mpsc::UnboundedSender<TaskEvent>) -> TaskEventSink {
    TaskEventSink::new(move |event: TaskEvent| sender.send(event).is_ok())
}
