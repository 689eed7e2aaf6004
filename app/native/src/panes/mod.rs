//! Side-by-side panes.
//!
//! - [`layout`]: pane widths for a split ratio
//! - [`divider`]: the long-press divider drag gesture and ratio snapping
//! - [`animation`]: decelerating ratio animations, cancel-on-new
//! - [`resize`]: debounced single-flight display resizing per slot
//! - [`pane`]: one pane bound to a slot's virtual display
//! - [`controller`]: the UI-owned controller tying them together

pub mod animation;
pub mod controller;
pub mod divider;
pub mod layout;
pub mod pane;
pub mod resize;

pub use animation::{AnimationOutcome, AnimationSettings, RatioAnimator, RatioCell, decelerate};
pub use controller::{ControllerSignal, PaneController};
pub use divider::{Divider, DividerEvent, DividerSettings, DividerState};
pub use layout::{pane_offsets, pane_widths};
pub use pane::{AppLauncher, PaneHandle, PaneServices};
pub use resize::{ResizeRequest, ResizeScheduler, ResizeTarget};
