//! Input injection configuration types.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::platform::MotionAction;

/// Input synchronization policy and gesture defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct InputConfig {
    /// Actions preceded by an input-transaction sync.
    /// Default: every action except `down`, `pointerDown` and `hoverEnter`
    pub sync_before: Vec<MotionAction>,

    /// Actions followed by an input-transaction sync.
    /// Default: `up`, `pointerUp`, `cancel`, `hoverExit`
    pub sync_after: Vec<MotionAction>,

    /// Number of MOVE events in a swipe.
    /// Default: 10
    pub swipe_steps: u32,

    /// Default swipe duration.
    /// Default: 300
    pub swipe_duration_ms: u64,

    /// Default long press hold time.
    /// Default: 800
    pub long_press_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sync_before: MotionAction::ALL
                .into_iter()
                .filter(|action| {
                    !matches!(
                        action,
                        MotionAction::Down | MotionAction::PointerDown | MotionAction::HoverEnter
                    )
                })
                .collect(),
            sync_after: vec![
                MotionAction::Up,
                MotionAction::PointerUp,
                MotionAction::Cancel,
                MotionAction::HoverExit,
            ],
            swipe_steps: 10,
            swipe_duration_ms: 300,
            long_press_ms: 800,
        }
    }
}

impl InputConfig {
    #[must_use]
    pub const fn swipe_duration(&self) -> Duration { Duration::from_millis(self.swipe_duration_ms) }

    #[must_use]
    pub const fn long_press(&self) -> Duration { Duration::from_millis(self.long_press_ms) }
}
