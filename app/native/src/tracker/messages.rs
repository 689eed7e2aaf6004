//! Message types for the tracker actor.
//!
//! - `TrackerMessage`: task events, commands and queries sent to the actor
//! - `TrackerNotification`: foreground changes broadcast to listeners

use std::collections::BTreeMap;
use std::fmt;

use eyeball::Subscriber;
use serde::Serialize;
use tokio::sync::oneshot;

use super::state::ForegroundMap;
use crate::platform::{DisplayId, TaskEvent};

/// Messages processed by the tracker actor, in arrival order.
pub enum TrackerMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Task events (from the platform listener or the shell poller)
    // ════════════════════════════════════════════════════════════════════════
    Event(TaskEvent),

    /// A pending launch's confirmation window elapsed.
    PendingTimeout { display_id: DisplayId, package: String },

    // ════════════════════════════════════════════════════════════════════════
    // Commands
    // ════════════════════════════════════════════════════════════════════════
    Launch {
        package: String,
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    LaunchFullscreen {
        package: String,
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    ForceStop {
        package: String,
        respond_to: oneshot::Sender<bool>,
    },
    ClearDisplay {
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    MoveToBack {
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    RemoveVisible {
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    SendToBackground {
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    TopActivity {
        display_id: DisplayId,
        respond_to: oneshot::Sender<Option<String>>,
    },
    CanGoBack {
        display_id: DisplayId,
        respond_to: oneshot::Sender<bool>,
    },
    Foreground {
        display_id: DisplayId,
        respond_to: oneshot::Sender<Option<String>>,
    },
    Snapshot { respond_to: oneshot::Sender<ForegroundMap> },
    PendingLaunches { respond_to: oneshot::Sender<BTreeMap<DisplayId, String>> },
    Subscribe { respond_to: oneshot::Sender<Subscriber<ForegroundMap>> },

    // ════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ════════════════════════════════════════════════════════════════════════
    /// Unregister the task listener but keep serving commands.
    StopListening,

    /// Unregister the listener, drop all state and exit.
    Shutdown,
}

impl TrackerMessage {
    /// Returns the message name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Event(event) => event.name(),
            Self::PendingTimeout { .. } => "PendingTimeout",
            Self::Launch { .. } => "Launch",
            Self::LaunchFullscreen { .. } => "LaunchFullscreen",
            Self::ForceStop { .. } => "ForceStop",
            Self::ClearDisplay { .. } => "ClearDisplay",
            Self::MoveToBack { .. } => "MoveToBack",
            Self::RemoveVisible { .. } => "RemoveVisible",
            Self::SendToBackground { .. } => "SendToBackground",
            Self::TopActivity { .. } => "TopActivity",
            Self::CanGoBack { .. } => "CanGoBack",
            Self::Foreground { .. } => "Foreground",
            Self::Snapshot { .. } => "Snapshot",
            Self::PendingLaunches { .. } => "PendingLaunches",
            Self::Subscribe { .. } => "Subscribe",
            Self::StopListening => "StopListening",
            Self::Shutdown => "Shutdown",
        }
    }
}

impl fmt::Debug for TrackerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Foreground changes pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TrackerNotification {
    /// A new package became foreground on a display.
    #[serde(rename_all = "camelCase")]
    AppChanged { display_id: DisplayId, package: String },
    /// The last visible task on a display went away.
    #[serde(rename_all = "camelCase")]
    AppClosed { display_id: DisplayId },
}
