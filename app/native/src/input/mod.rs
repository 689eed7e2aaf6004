//! Display-targeted input injection.
//!
//! [`InputRouter`] is what panes and the CLI talk to. Two implementations
//! exist:
//!
//! - [`InputInjector`] builds complete motion and key events, stamps them
//!   with the target display and feeds them to a privileged
//!   [`InputBackend`](crate::platform::backend::InputBackend), applying the
//!   down-time bookkeeping and the sync policy.
//! - [`ShellInput`](crate::shell::ShellInput) shells out to `input -d N ...`.
//!
//! Gestures are built from the two primitives by default and block the
//! calling thread for their duration; run them off the UI and control paths.

pub mod clock;
pub mod down_time;
pub mod gestures;
pub mod injector;
pub mod sync;
pub mod touch;

use std::time::Duration;

pub use clock::{Clock, MonotonicClock};
pub use down_time::DownTimeMap;
pub use injector::InputInjector;
pub use sync::{ActionSet, SyncPolicy};
pub use touch::TouchMapping;

use crate::platform::{DisplayId, MotionAction, Pointer, keycode};

/// Routes pointer and key input to a specific display.
///
/// Every method reports success as a `bool`: input failures degrade
/// silently and are only logged.
pub trait InputRouter: Send + Sync {
    /// Injects one motion event with the given pointers.
    fn inject_pointer(&self, display_id: DisplayId, action: MotionAction, pointers: &[Pointer]) -> bool;

    /// Injects a key press (DOWN then UP).
    fn inject_key(&self, display_id: DisplayId, key_code: i32) -> bool;

    /// Waits between gesture steps.
    fn pause(&self, duration: Duration) { std::thread::sleep(duration); }

    /// DOWN then UP at one point.
    fn tap(&self, display_id: DisplayId, x: f32, y: f32) -> bool {
        gestures::tap(self, display_id, x, y)
    }

    /// DOWN at `from`, `steps` evenly spaced MOVEs, UP at `to`.
    fn swipe(
        &self,
        display_id: DisplayId,
        from: (f32, f32),
        to: (f32, f32),
        duration: Duration,
        steps: u32,
    ) -> bool {
        gestures::swipe(self, display_id, from, to, duration, steps)
    }

    /// DOWN, hold, UP.
    fn long_press(&self, display_id: DisplayId, x: f32, y: f32, hold: Duration) -> bool {
        gestures::long_press(self, display_id, x, y, hold)
    }

    fn send_back(&self, display_id: DisplayId) -> bool { self.inject_key(display_id, keycode::BACK) }

    fn send_home(&self, display_id: DisplayId) -> bool { self.inject_key(display_id, keycode::HOME) }
}
