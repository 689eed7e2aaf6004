//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r##"// CarrotPlay Configuration File
// =============================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // ============================================================================
  // Panes
  // ============================================================================
  // "panes": {
  //   // Number of side-by-side panes (2 or 3)
  //   "count": 2,
  //
  //   // Slot index of the first pane; pane n uses slotBase + n
  //   "slotBase": 100,
  //
  //   // Initial split ratio of the first pane
  //   "defaultRatio": 0.5,
  //
  //   // Density (dpi) of pane displays
  //   "density": 160,
  //
  //   // Delay before retrying a launch whose display is not ready yet
  //   "displayReadyRetryMs": 500
  // },

  // ============================================================================
  // Divider
  // ============================================================================
  // Long-press the divider, then drag to change the split.
  // "divider": {
  //   "width": 8,
  //   "hitPadding": 20,
  //   "longPressMs": 1000,
  //   "touchSlop": 10.0,
  //   "minRatio": 0.25,
  //   "maxRatio": 0.75,
  //   "snapStep": 0.05
  // },

  // ============================================================================
  // Ratio Animation
  // ============================================================================
  // "animation": {
  //   "durationMs": 150,
  //   "decelerateFactor": 1.5,
  //   // Smaller changes are applied immediately
  //   "minDelta": 0.01,
  //   "frameIntervalMs": 16
  // },

  // ============================================================================
  // Display Resize
  // ============================================================================
  // "resize": {
  //   // Quiet period before a resize runs; newer requests replace older ones
  //   "debounceMs": 50,
  //   // Delay before retrying while a resize is still in flight
  //   "retryMs": 100
  // },

  // ============================================================================
  // Input Injection
  // ============================================================================
  // "input": {
  //   // Actions preceded by an input-transaction sync
  //   "syncBefore": ["up", "move", "cancel", "outside", "pointerUp", "hoverMove", "scroll", "hoverExit"],
  //
  //   // Actions followed by an input-transaction sync
  //   "syncAfter": ["up", "pointerUp", "cancel", "hoverExit"],
  //
  //   "swipeSteps": 10,
  //   "swipeDurationMs": 300,
  //   "longPressMs": 800
  // },

  // ============================================================================
  // Task Tracker
  // ============================================================================
  // "tracker": {
  //   // Focus a launched task explicitly if no moved-to-front event arrives in time
  //   "pendingFocusTimeoutMs": 500,
  //
  //   // Task list polling interval when running on the shell fallback
  //   "pollIntervalMs": 500,
  //
  //   "queryTimeoutMs": 2000,
  //
  //   // Resize mode applied to new tasks (4 = resizeable)
  //   "resizeableMode": 4
  // },

  // ============================================================================
  // Elevated Shell
  // ============================================================================
  // "shell": {
  //   "binary": "su",
  //   // Use host-supplied privileged providers when available
  //   "preferPrivileged": true
  // }
}
"##
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
