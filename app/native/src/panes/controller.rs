//! Side-by-side pane controller.
//!
//! Owns the panes, the divider gesture and the split ratio. It lives on
//! the UI thread (`&mut self` everywhere); timers it starts report back
//! through an internal channel drained by [`PaneController::process_signals`]
//! or awaited with [`PaneController::next_signal`].
//!
//! Ratio updates follow two paths:
//!
//! - Previews (divider drag, animation frames) only move the ratio.
//! - Settled ratios ([`PaneController::set_ratio`], a released drag, a
//!   finished animation) also resize every pane display.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::animation::{AnimationOutcome, AnimationSettings, RatioAnimator, RatioCell};
use super::divider::{Divider, DividerEvent, DividerSettings};
use super::layout::{PaneWidths, pane_offsets, pane_widths};
use super::pane::{PaneHandle, PaneServices};
use super::resize::ResizeRequest;
use crate::config::CarrotConfig;
use crate::platform::{MotionAction, Pointer, Pointers};
use crate::tracker::TrackerNotification;

/// Timer callbacks routed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerSignal {
    LongPressElapsed { generation: u64 },
    /// A ratio animation reached its target.
    AnimationSettled,
}

/// Listener for settled ratios.
pub type RatioListener = Box<dyn FnMut(f32) + Send>;

/// The pane layout controller.
pub struct PaneController {
    panes: Vec<PaneHandle>,
    divider: Divider,
    divider_width: u32,
    ratio: RatioCell,
    /// Ratio the pane sizes were last computed for.
    laid_out_ratio: f32,
    animator: RatioAnimator,
    services: PaneServices,
    container_width: u32,
    container_height: u32,
    density: u32,
    /// Pane receiving the touch gesture in progress.
    touch_target: Option<usize>,
    ratio_listener: Option<RatioListener>,
    long_press_timer: Option<JoinHandle<()>>,
    signal_tx: mpsc::UnboundedSender<ControllerSignal>,
    signal_rx: mpsc::UnboundedReceiver<ControllerSignal>,
}

impl PaneController {
    /// Builds the controller with `panes.count` panes on consecutive slots.
    #[must_use]
    pub fn new(config: &CarrotConfig, services: PaneServices) -> Self {
        let divider = Divider::new(DividerSettings::from(&config.divider));
        let initial = divider.settings().clamp(config.panes.default_ratio);
        let panes = (0..config.panes.pane_count())
            .map(|index| {
                let offset = u32::try_from(index).unwrap_or(u32::MAX);
                PaneHandle::new(
                    index,
                    config.panes.slot_base.saturating_add(offset),
                    config.panes.density,
                    config.panes.display_ready_retry(),
                    services.clone(),
                )
            })
            .collect();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        Self {
            panes,
            divider,
            divider_width: config.divider.width,
            ratio: Arc::new(watch::channel(initial).0),
            laid_out_ratio: initial,
            animator: RatioAnimator::new(AnimationSettings::from(&config.animation)),
            services,
            container_width: 0,
            container_height: 0,
            density: config.panes.density,
            touch_target: None,
            ratio_listener: None,
            long_press_timer: None,
            signal_tx,
            signal_rx,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn ratio(&self) -> f32 { *self.ratio.borrow() }

    /// Observes every ratio change, including animation frames.
    #[must_use]
    pub fn subscribe_ratio(&self) -> watch::Receiver<f32> { self.ratio.subscribe() }

    #[must_use]
    pub fn panes(&self) -> &[PaneHandle] { &self.panes }

    #[must_use]
    pub fn pane(&self, index: usize) -> Option<&PaneHandle> { self.panes.get(index) }

    pub fn pane_mut(&mut self, index: usize) -> Option<&mut PaneHandle> { self.panes.get_mut(index) }

    #[must_use]
    pub const fn divider(&self) -> &Divider { &self.divider }

    #[must_use]
    pub const fn container_size(&self) -> (u32, u32) { (self.container_width, self.container_height) }

    /// Pane widths at the current ratio.
    #[must_use]
    pub fn pane_widths(&self) -> PaneWidths { self.widths_at(self.ratio()) }

    pub fn set_ratio_listener(&mut self, listener: impl FnMut(f32) + Send + 'static) {
        self.ratio_listener = Some(Box::new(listener));
    }

    // ========================================================================
    // Ratio
    // ========================================================================

    /// Jumps to `ratio` (clamped) and resizes the displays.
    pub fn set_ratio(&mut self, ratio: f32) {
        self.animator.cancel();
        let ratio = self.divider.settings().clamp(ratio);
        self.ratio.send_replace(ratio);
        self.apply_layout(ratio);
        self.resize_displays();
    }

    /// Animates to `ratio` (clamped); displays are resized once it settles.
    ///
    /// Pane sizes follow the animated ratio: touches re-sync them, and the
    /// final layout is applied when the settled signal is processed.
    pub fn set_ratio_animated(&mut self, ratio: f32) -> AnimationOutcome {
        let target = self.divider.settings().clamp(ratio);
        let requests = self.resize_requests_at(target);
        let resizer = self.services.resizer.clone();
        let signals = self.signal_tx.clone();

        let outcome = self.animator.animate(&self.ratio, target, move |_| {
            for request in requests {
                resizer.request(request);
            }
            let _ = signals.send(ControllerSignal::AnimationSettled);
        });
        if outcome == AnimationOutcome::Applied {
            self.sync_layout();
        }
        outcome
    }

    /// Settles the split on `ratio`: applies it, resizes the displays and
    /// tells the ratio listener.
    pub fn on_ratio_change(&mut self, ratio: f32) {
        self.set_ratio(ratio);
        let ratio = self.ratio();
        tracing::debug!(ratio, "split ratio changed");
        if let Some(listener) = self.ratio_listener.as_mut() {
            listener(ratio);
        }
    }

    // ========================================================================
    // Touch
    // ========================================================================

    /// Feeds a container-space touch to the divider.
    ///
    /// Returns whether the divider consumed it.
    pub fn on_divider_touch(&mut self, action: MotionAction, x: f32) -> bool {
        let event = self.divider.on_touch(action, x, self.container_width, self.ratio(), Instant::now());
        self.handle_divider_event(event)
    }

    /// Routes a container-space touch: to the divider first, otherwise to
    /// the pane under the gesture's first DOWN.
    pub fn on_touch(&mut self, action: MotionAction, pointers: &[Pointer]) -> bool {
        let Some(first) = pointers.first() else {
            return false;
        };
        self.sync_layout();
        if self.on_divider_touch(action, first.coords.x) {
            self.touch_target = None;
            return true;
        }

        if action == MotionAction::Down {
            self.touch_target = self.pane_at(first.coords.x);
        }
        let Some(index) = self.touch_target else {
            return false;
        };
        let offsets = pane_offsets(&self.pane_widths(), self.divider_width);
        #[allow(clippy::cast_precision_loss)]
        let offset = offsets.get(index).copied().unwrap_or(0) as f32;
        let local: Pointers = pointers
            .iter()
            .map(|pointer| {
                let mut local = *pointer;
                local.coords.x -= offset;
                local
            })
            .collect();

        let forwarded = self.panes.get(index).is_some_and(|pane| pane.forward_touch(action, &local));
        if matches!(action, MotionAction::Up | MotionAction::Cancel) {
            self.touch_target = None;
        }
        forwarded
    }

    /// Index of the pane containing container x-coordinate `x`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pane_at(&self, x: f32) -> Option<usize> {
        let widths = self.pane_widths();
        let offsets = pane_offsets(&widths, self.divider_width);
        offsets.iter().zip(widths.iter()).position(|(left, width)| {
            let left = *left as f32;
            x >= left && x < left + *width as f32
        })
    }

    fn handle_divider_event(&mut self, event: DividerEvent) -> bool {
        match event {
            DividerEvent::Armed { generation, .. } => self.start_long_press_timer(generation),
            DividerEvent::Cancelled | DividerEvent::DragStarted => self.stop_long_press_timer(),
            DividerEvent::Preview(ratio) => {
                self.ratio.send_replace(ratio);
                self.apply_layout(ratio);
            }
            DividerEvent::Released(ratio) => {
                self.stop_long_press_timer();
                self.on_ratio_change(ratio);
            }
            DividerEvent::Ignored | DividerEvent::Consumed => {}
        }
        event.is_consumed()
    }

    fn start_long_press_timer(&mut self, generation: u64) {
        self.stop_long_press_timer();
        let Ok(runtime) = Handle::try_current() else {
            return;
        };
        let delay = self.divider.settings().long_press;
        let signals = self.signal_tx.clone();
        self.long_press_timer = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The controller may be gone; nothing to do then.
            let _ = signals.send(ControllerSignal::LongPressElapsed { generation });
        }));
    }

    fn stop_long_press_timer(&mut self) {
        if let Some(timer) = self.long_press_timer.take() {
            timer.abort();
        }
    }

    // ========================================================================
    // Signals
    // ========================================================================

    /// Applies every timer signal that has already arrived.
    pub fn process_signals(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.apply_signal(signal);
            processed += 1;
        }
        processed
    }

    /// Waits for the next timer signal and applies it.
    pub async fn next_signal(&mut self) -> Option<ControllerSignal> {
        let signal = self.signal_rx.recv().await?;
        self.apply_signal(signal);
        Some(signal)
    }

    fn apply_signal(&mut self, signal: ControllerSignal) {
        match signal {
            ControllerSignal::LongPressElapsed { generation } => {
                let event = self.divider.on_long_press_elapsed(generation);
                self.handle_divider_event(event);
            }
            ControllerSignal::AnimationSettled => self.sync_layout(),
        }
    }

    /// Routes tracker notifications to the pane showing that display.
    pub fn apply_notification(&mut self, notification: &TrackerNotification) -> bool {
        self.panes.iter_mut().any(|pane| pane.apply_notification(notification))
    }

    // ========================================================================
    // Container
    // ========================================================================

    /// The container was laid out at a new size.
    pub fn container_resized(&mut self, width: u32, height: u32) {
        if (width, height) == (self.container_width, self.container_height) {
            return;
        }
        tracing::debug!(width, height, "pane container resized");
        self.container_width = width;
        self.container_height = height;
        self.divider.reset();
        self.apply_layout(self.ratio());
        self.resize_displays();
    }

    /// Stops timers and animations and releases every pane display.
    pub fn release(&mut self) {
        self.stop_long_press_timer();
        self.animator.cancel();
        self.services.resizer.cancel_all();
        self.divider.reset();
        for pane in &mut self.panes {
            pane.release();
        }
        tracing::info!(panes = self.panes.len(), "pane controller released");
    }

    /// Detaches every pane surface, keeping displays and apps alive.
    pub fn dispose(&mut self) {
        self.stop_long_press_timer();
        self.animator.cancel();
        self.divider.reset();
        for pane in &mut self.panes {
            pane.dispose();
        }
        self.services.cache.log_status();
    }

    fn widths_at(&self, ratio: f32) -> PaneWidths {
        pane_widths(self.container_width, self.panes.len(), self.divider_width, ratio)
    }

    /// Re-lays out the panes if the ratio moved since the last layout.
    fn sync_layout(&mut self) {
        let ratio = self.ratio();
        if (ratio - self.laid_out_ratio).abs() > f32::EPSILON {
            self.apply_layout(ratio);
        }
    }

    fn apply_layout(&mut self, ratio: f32) {
        self.laid_out_ratio = ratio;
        let widths = self.widths_at(ratio);
        let height = self.container_height;
        for (pane, width) in self.panes.iter_mut().zip(widths) {
            pane.set_size(width, height);
        }
    }

    fn resize_requests_at(&self, ratio: f32) -> Vec<ResizeRequest> {
        self.widths_at(ratio)
            .into_iter()
            .zip(&self.panes)
            .filter(|(_, pane)| self.services.cache.display_id(pane.slot()).is_some())
            .map(|(width, pane)| ResizeRequest {
                slot: pane.slot(),
                width,
                height: self.container_height,
                density: pane.density(),
            })
            .collect()
    }

    fn resize_displays(&self) {
        for pane in &self.panes {
            if self.services.cache.display_id(pane.slot()).is_some() {
                pane.schedule_resize();
            }
        }
    }

    #[must_use]
    pub const fn density(&self) -> u32 { self.density }
}

impl Drop for PaneController {
    fn drop(&mut self) { self.stop_long_press_timer(); }
}
