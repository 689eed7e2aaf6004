//! Animated split ratio changes.
//!
//! An animation interpolates the shared ratio cell frame by frame on the
//! tokio runtime. Starting a new animation aborts the running one; only an
//! animation that runs to its end invokes its completion callback, so the
//! displays are resized once per settled ratio.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::AnimationConfig;

/// The current split ratio, observable by the UI.
pub type RatioCell = Arc<watch::Sender<f32>>;

// ============================================================================
// Easing
// ============================================================================

/// Linear interpolation.
#[inline]
#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 { (end - start).mul_add(t, start) }

/// Decelerating curve `1 - (1 - t)^(2 * factor)`.
///
/// A factor of 1 is the classic quadratic ease-out; larger factors slow
/// down harder towards the end.
#[inline]
#[must_use]
pub fn decelerate(t: f32, factor: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powf(2.0 * factor)
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub duration: Duration,
    pub frame_interval: Duration,
    pub decelerate_factor: f32,
    /// Changes smaller than this are not animated.
    pub min_delta: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self { Self::from(&AnimationConfig::default()) }
}

impl From<&AnimationConfig> for AnimationSettings {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            duration: config.duration(),
            frame_interval: config.frame_interval(),
            decelerate_factor: config.decelerate_factor.max(0.0),
            min_delta: config.min_delta.max(0.0),
        }
    }
}

impl AnimationSettings {
    /// Ratio at `elapsed` into an animation from `from` to `to`.
    #[must_use]
    pub fn frame_at(&self, from: f32, to: f32, elapsed: Duration) -> f32 {
        if self.duration.is_zero() {
            return to;
        }
        let t = (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0);
        lerp(from, to, decelerate(t, self.decelerate_factor))
    }
}

// ============================================================================
// Animator
// ============================================================================

/// How an animation request was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// The change was below the minimum delta; nothing happened.
    Skipped,
    /// No runtime to animate on; the target was applied at once.
    Applied,
    Started,
}

/// Runs at most one ratio animation at a time.
#[derive(Debug)]
pub struct RatioAnimator {
    settings: AnimationSettings,
    running: Option<JoinHandle<()>>,
}

impl RatioAnimator {
    #[must_use]
    pub const fn new(settings: AnimationSettings) -> Self { Self { settings, running: None } }

    #[must_use]
    pub const fn settings(&self) -> &AnimationSettings { &self.settings }

    /// Animates `ratio` to `target`, then calls `on_complete` with it.
    ///
    /// Any running animation is aborted without completing.
    pub fn animate(
        &mut self,
        ratio: &RatioCell,
        target: f32,
        on_complete: impl FnOnce(f32) + Send + 'static,
    ) -> AnimationOutcome {
        let from = *ratio.borrow();
        if (target - from).abs() < self.settings.min_delta {
            tracing::trace!(from, target, "ratio change below animation threshold");
            return AnimationOutcome::Skipped;
        }

        self.cancel();

        let Ok(runtime) = Handle::try_current() else {
            ratio.send_replace(target);
            on_complete(target);
            return AnimationOutcome::Applied;
        };

        tracing::debug!(from, target, "animating split ratio");
        let settings = self.settings;
        let ratio = Arc::clone(ratio);
        self.running = Some(runtime.spawn(async move {
            let started = Instant::now();
            let mut frames = tokio::time::interval(settings.frame_interval);
            frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                frames.tick().await;
                let elapsed = started.elapsed();
                if elapsed >= settings.duration {
                    break;
                }
                ratio.send_replace(settings.frame_at(from, target, elapsed));
            }

            ratio.send_replace(target);
            on_complete(target);
        }));
        AnimationOutcome::Started
    }

    /// Aborts the running animation, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        let Some(running) = self.running.take() else {
            return false;
        };
        let was_running = !running.is_finished();
        running.abort();
        if was_running {
            tracing::trace!("ratio animation cancelled");
        }
        was_running
    }

    #[must_use]
    pub fn is_running(&self) -> bool { self.running.as_ref().is_some_and(|running| !running.is_finished()) }
}

impl Drop for RatioAnimator {
    fn drop(&mut self) { self.cancel(); }
}
