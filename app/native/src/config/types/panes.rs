//! Pane layout configuration types.
//!
//! Covers pane count and slot numbering, the divider gesture, the ratio
//! animation and the display resize scheduler.

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pane count and virtual display defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PanesConfig {
    /// Number of side-by-side panes (2 or 3).
    /// Default: 2
    pub count: u8,

    /// Slot index of the first pane. Pane `n` uses `slotBase + n`.
    /// Default: 100
    pub slot_base: u32,

    /// Initial split ratio of the first pane.
    /// Default: 0.5
    pub default_ratio: f32,

    /// Density (dpi) of pane displays.
    /// Default: 160
    pub density: u32,

    /// Delay before retrying a launch whose display is not ready yet.
    /// Default: 500
    pub display_ready_retry_ms: u64,
}

impl Default for PanesConfig {
    fn default() -> Self {
        Self {
            count: 2,
            slot_base: 100,
            default_ratio: 0.5,
            density: 160,
            display_ready_retry_ms: 500,
        }
    }
}

impl PanesConfig {
    /// Pane count clamped to the supported range.
    #[must_use]
    pub fn pane_count(&self) -> usize { usize::from(self.count.clamp(2, 3)) }

    #[must_use]
    pub const fn display_ready_retry(&self) -> Duration {
        Duration::from_millis(self.display_ready_retry_ms)
    }
}

/// Divider drag gesture and ratio bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct DividerConfig {
    /// Divider width in pixels.
    /// Default: 8
    pub width: u32,

    /// Extra touchable padding on each side of the divider.
    /// Default: 20
    pub hit_padding: f32,

    /// Hold time before a divider drag starts.
    /// Default: 1000
    pub long_press_ms: u64,

    /// Movement in pixels that cancels a pending long press.
    /// Default: 10.0
    pub touch_slop: f32,

    /// Smallest allowed ratio.
    /// Default: 0.25
    pub min_ratio: f32,

    /// Largest allowed ratio.
    /// Default: 0.75
    pub max_ratio: f32,

    /// Grid the ratio snaps onto.
    /// Default: 0.05
    pub snap_step: f32,
}

impl Default for DividerConfig {
    fn default() -> Self {
        Self {
            width: 8,
            hit_padding: 20.0,
            long_press_ms: 1000,
            touch_slop: 10.0,
            min_ratio: 0.25,
            max_ratio: 0.75,
            snap_step: 0.05,
        }
    }
}

impl DividerConfig {
    #[must_use]
    pub const fn long_press(&self) -> Duration { Duration::from_millis(self.long_press_ms) }
}

/// Animated ratio changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationConfig {
    /// Animation length.
    /// Default: 150
    pub duration_ms: u64,

    /// Decelerate curve factor.
    /// Default: 1.5
    pub decelerate_factor: f32,

    /// Ratio changes smaller than this are applied without animating.
    /// Default: 0.01
    pub min_delta: f32,

    /// Interval between animation frames.
    /// Default: 16
    pub frame_interval_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: 150,
            decelerate_factor: 1.5,
            min_delta: 0.01,
            frame_interval_ms: 16,
        }
    }
}

impl AnimationConfig {
    #[must_use]
    pub const fn duration(&self) -> Duration { Duration::from_millis(self.duration_ms) }

    #[must_use]
    pub fn frame_interval(&self) -> Duration { Duration::from_millis(self.frame_interval_ms.max(1)) }
}

/// Display resize scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeConfig {
    /// Quiet period before a resize request runs.
    /// Default: 50
    pub debounce_ms: u64,

    /// Delay before retrying while a resize is still in flight.
    /// Default: 100
    pub retry_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self { Self { debounce_ms: 50, retry_ms: 100 } }
}

impl ResizeConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }

    #[must_use]
    pub const fn retry(&self) -> Duration { Duration::from_millis(self.retry_ms) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panes_defaults() {
        let config = PanesConfig::default();
        assert_eq!(config.count, 2);
        assert_eq!(config.slot_base, 100);
        assert_eq!(config.display_ready_retry(), Duration::from_millis(500));
    }

    #[test]
    fn test_pane_count_is_clamped() {
        let too_many = PanesConfig { count: 9, ..PanesConfig::default() };
        assert_eq!(too_many.pane_count(), 3);
        let too_few = PanesConfig { count: 0, ..PanesConfig::default() };
        assert_eq!(too_few.pane_count(), 2);
    }

    #[test]
    fn test_divider_defaults() {
        let config = DividerConfig::default();
        assert_eq!(config.width, 8);
        assert_eq!(config.long_press(), Duration::from_secs(1));
        assert!((config.min_ratio - 0.25).abs() < f32::EPSILON);
        assert!((config.max_ratio - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_divider_config_keeps_defaults() {
        let config: DividerConfig = serde_json::from_str(r#"{ "longPressMs": 600 }"#).unwrap();
        assert_eq!(config.long_press_ms, 600);
        assert_eq!(config.width, 8);
    }

    #[test]
    fn test_animation_frame_interval_never_zero() {
        let config = AnimationConfig { frame_interval_ms: 0, ..AnimationConfig::default() };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_resize_defaults() {
        let config = ResizeConfig::default();
        assert_eq!(config.debounce(), Duration::from_millis(50));
        assert_eq!(config.retry(), Duration::from_millis(100));
    }
}
