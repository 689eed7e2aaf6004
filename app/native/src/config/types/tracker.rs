//! Task tracker and shell configuration types.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Task state tracker timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackerConfig {
    /// How long a pending launch waits for its moved-to-front event before
    /// the task is focused explicitly.
    /// Default: 500
    pub pending_focus_timeout_ms: u64,

    /// Task list polling interval when no privileged listener is available.
    /// Default: 500
    pub poll_interval_ms: u64,

    /// Maximum wait for a tracker query.
    /// Default: 2000
    pub query_timeout_ms: u64,

    /// Resize mode applied to newly created tasks.
    /// Default: 4 (resizeable)
    pub resizeable_mode: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            pending_focus_timeout_ms: 500,
            poll_interval_ms: 500,
            query_timeout_ms: 2000,
            resizeable_mode: 4,
        }
    }
}

impl TrackerConfig {
    #[must_use]
    pub const fn pending_focus_timeout(&self) -> Duration {
        Duration::from_millis(self.pending_focus_timeout_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.poll_interval_ms.max(10)) }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration { Duration::from_millis(self.query_timeout_ms) }
}

/// Elevated shell settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    /// Binary used to obtain an elevated shell.
    /// Default: "su"
    pub binary: String,

    /// Use host-supplied privileged providers when they pass their probe.
    /// Default: true
    pub prefer_privileged: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            binary: "su".to_string(),
            prefer_privileged: true,
        }
    }
}
