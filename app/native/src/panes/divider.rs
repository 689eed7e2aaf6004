//! Divider drag gesture.
//!
//! # Flow
//!
//! 1. DOWN inside the hit zone arms a long press and consumes the gesture.
//! 2. Moving further than the touch slop before the long press elapses
//!    cancels it; the rest of the gesture is ignored.
//! 3. Once the long press elapses the divider is dragging. Each MOVE maps
//!    the horizontal offset onto a snapped ratio and previews it.
//! 4. UP or CANCEL while dragging releases the drag with the final ratio.
//!
//! The long press elapses either through [`Divider::on_long_press_elapsed`]
//! (driven by a timer) or when a MOVE arrives past the deadline.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::DividerConfig;
use crate::platform::MotionAction;

/// Tolerance for snapping values that sit on a grid line.
const GRID_EPSILON: f32 = 1e-4;

/// Divider geometry, timing and ratio bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerSettings {
    pub width: f32,
    pub hit_padding: f32,
    pub long_press: Duration,
    pub touch_slop: f32,
    pub min_ratio: f32,
    pub max_ratio: f32,
    pub snap_step: f32,
}

impl Default for DividerSettings {
    fn default() -> Self { Self::from(&DividerConfig::default()) }
}

impl From<&DividerConfig> for DividerSettings {
    #[allow(clippy::cast_precision_loss)]
    fn from(config: &DividerConfig) -> Self {
        let min_ratio = config.min_ratio.min(config.max_ratio);
        Self {
            width: config.width as f32,
            hit_padding: config.hit_padding.max(0.0),
            long_press: config.long_press(),
            touch_slop: config.touch_slop.max(0.0),
            min_ratio,
            max_ratio: config.max_ratio.max(min_ratio),
            snap_step: config.snap_step,
        }
    }
}

impl DividerSettings {
    /// Clamps `ratio` into bounds and floors it onto the snap grid.
    ///
    /// The result always lies on the grid within bounds, so snapping a
    /// snapped ratio returns it unchanged.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snap(&self, ratio: f32) -> f32 {
        let clamped = ratio.clamp(self.min_ratio, self.max_ratio);
        if self.snap_step <= 0.0 {
            return clamped;
        }
        let step = self.snap_step;
        let lowest = (self.min_ratio / step - GRID_EPSILON).ceil();
        let highest = (self.max_ratio / step + GRID_EPSILON).floor();
        if lowest > highest {
            return clamped;
        }
        let index = (clamped / step + GRID_EPSILON).floor().clamp(lowest, highest);
        index * step
    }

    /// Clamps `ratio` into bounds without snapping.
    #[must_use]
    pub fn clamp(&self, ratio: f32) -> f32 { ratio.clamp(self.min_ratio, self.max_ratio) }

    /// Horizontal extent of the touchable divider area.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_zone(&self, container_width: u32, ratio: f32) -> (f32, f32) {
        let track = (container_width as f32 - self.width).max(0.0);
        let left = track.mul_add(ratio, -self.hit_padding);
        (left, left + self.width + 2.0 * self.hit_padding)
    }

    #[must_use]
    pub fn is_on_divider(&self, x: f32, container_width: u32, ratio: f32) -> bool {
        let (left, right) = self.hit_zone(container_width, ratio);
        (left..=right).contains(&x)
    }

    /// Ratio after dragging `dx` pixels from `start_ratio`, snapped.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn drag_ratio(&self, start_ratio: f32, dx: f32, container_width: u32) -> f32 {
        let track = container_width as f32 - self.width;
        if track <= 0.0 {
            return self.snap(start_ratio);
        }
        self.snap(start_ratio + dx / track)
    }
}

/// Where the divider gesture is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividerState {
    Idle,
    /// DOWN landed on the divider; waiting for the long press.
    PendingLongPress { start_x: f32, start_ratio: f32, deadline: Instant, generation: u64 },
    Dragging { start_x: f32, start_ratio: f32 },
    /// The gesture was cancelled; ignore input until the next DOWN.
    Abandoned,
}

/// Result of feeding input to the divider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DividerEvent {
    /// Not a divider gesture; the caller should route the touch elsewhere.
    Ignored,
    /// Consumed with no visible effect.
    Consumed,
    /// A long press was armed. `generation` identifies it for
    /// [`Divider::on_long_press_elapsed`].
    Armed { generation: u64, deadline: Instant },
    /// The pending long press was cancelled by movement or release.
    Cancelled,
    /// The long press elapsed and dragging started.
    DragStarted,
    /// The snapped ratio changed during the drag.
    Preview(f32),
    /// The drag ended with this ratio.
    Released(f32),
}

impl DividerEvent {
    /// Whether the touch belonged to the divider.
    #[must_use]
    pub const fn is_consumed(&self) -> bool { !matches!(self, Self::Ignored) }
}

/// Divider gesture state machine.
#[derive(Debug, Clone)]
pub struct Divider {
    settings: DividerSettings,
    state: DividerState,
    generation: u64,
}

impl Divider {
    #[must_use]
    pub const fn new(settings: DividerSettings) -> Self {
        Self { settings, state: DividerState::Idle, generation: 0 }
    }

    #[must_use]
    pub const fn settings(&self) -> &DividerSettings { &self.settings }

    #[must_use]
    pub const fn state(&self) -> DividerState { self.state }

    #[must_use]
    pub const fn is_dragging(&self) -> bool { matches!(self.state, DividerState::Dragging { .. }) }

    /// Feeds one touch. `ratio` is the current split ratio.
    pub fn on_touch(
        &mut self,
        action: MotionAction,
        x: f32,
        container_width: u32,
        ratio: f32,
        now: Instant,
    ) -> DividerEvent {
        match action {
            MotionAction::Down => self.on_down(x, container_width, ratio, now),
            MotionAction::Move => self.on_move(x, container_width, ratio, now),
            MotionAction::Up | MotionAction::Cancel => self.on_up(ratio),
            _ => self.passthrough(),
        }
    }

    /// Starts the drag if the long press `generation` is still pending.
    pub fn on_long_press_elapsed(&mut self, generation: u64) -> DividerEvent {
        match self.state {
            DividerState::PendingLongPress { start_x, start_ratio, generation: armed, .. }
                if armed == generation =>
            {
                tracing::debug!(start_ratio, "divider long press elapsed");
                self.state = DividerState::Dragging { start_x, start_ratio };
                DividerEvent::DragStarted
            }
            _ => DividerEvent::Ignored,
        }
    }

    /// Drops any gesture in progress.
    pub fn reset(&mut self) { self.state = DividerState::Idle; }

    fn on_down(&mut self, x: f32, container_width: u32, ratio: f32, now: Instant) -> DividerEvent {
        if !self.settings.is_on_divider(x, container_width, ratio) {
            self.state = DividerState::Idle;
            return DividerEvent::Ignored;
        }
        self.generation = self.generation.wrapping_add(1);
        let deadline = now + self.settings.long_press;
        self.state = DividerState::PendingLongPress {
            start_x: x,
            start_ratio: ratio,
            deadline,
            generation: self.generation,
        };
        tracing::trace!(x, ratio, "divider long press armed");
        DividerEvent::Armed { generation: self.generation, deadline }
    }

    fn on_move(&mut self, x: f32, container_width: u32, ratio: f32, now: Instant) -> DividerEvent {
        match self.state {
            DividerState::PendingLongPress { start_x, start_ratio, deadline, .. } => {
                if (x - start_x).abs() > self.settings.touch_slop {
                    tracing::trace!("divider long press cancelled by movement");
                    self.state = DividerState::Abandoned;
                    return DividerEvent::Cancelled;
                }
                if now < deadline {
                    return DividerEvent::Consumed;
                }
                self.state = DividerState::Dragging { start_x, start_ratio };
                self.preview(x, start_x, start_ratio, container_width, ratio)
            }
            DividerState::Dragging { start_x, start_ratio } => {
                self.preview(x, start_x, start_ratio, container_width, ratio)
            }
            DividerState::Idle | DividerState::Abandoned => DividerEvent::Ignored,
        }
    }

    fn on_up(&mut self, ratio: f32) -> DividerEvent {
        let previous = std::mem::replace(&mut self.state, DividerState::Idle);
        match previous {
            DividerState::PendingLongPress { .. } => DividerEvent::Cancelled,
            DividerState::Dragging { .. } => {
                let ratio = self.settings.snap(ratio);
                tracing::debug!(ratio, "divider drag released");
                DividerEvent::Released(ratio)
            }
            DividerState::Idle | DividerState::Abandoned => DividerEvent::Ignored,
        }
    }

    fn preview(
        &self,
        x: f32,
        start_x: f32,
        start_ratio: f32,
        container_width: u32,
        ratio: f32,
    ) -> DividerEvent {
        let next = self.settings.drag_ratio(start_ratio, x - start_x, container_width);
        if (next - ratio).abs() > f32::EPSILON {
            DividerEvent::Preview(next)
        } else {
            DividerEvent::Consumed
        }
    }

    const fn passthrough(&self) -> DividerEvent {
        match self.state {
            DividerState::PendingLongPress { .. } | DividerState::Dragging { .. } => {
                DividerEvent::Consumed
            }
            DividerState::Idle | DividerState::Abandoned => DividerEvent::Ignored,
        }
    }
}
