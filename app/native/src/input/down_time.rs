use std::collections::HashMap;

use parking_lot::Mutex;

use crate::platform::{DisplayId, MotionAction};

/// Per-display timestamp of the touch-down that started the current gesture.
///
/// Every event of a gesture must carry the same down time or the dispatcher
/// treats it as a new, inconsistent stream.
#[derive(Debug, Default)]
pub struct DownTimeMap {
    entries: Mutex<HashMap<DisplayId, u64>>,
}

impl DownTimeMap {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Returns the down time for an event with `action` at `now`.
    ///
    /// DOWN records `now`. UP and CANCEL consume the entry. Anything else
    /// reads it, falling back to `now` for a stream that never saw a DOWN.
    pub fn resolve(&self, display_id: DisplayId, action: MotionAction, now: u64) -> u64 {
        let mut entries = self.entries.lock();
        match action {
            MotionAction::Down => {
                entries.insert(display_id, now);
                now
            }
            MotionAction::Up | MotionAction::Cancel => entries.remove(&display_id).unwrap_or(now),
            _ => entries.get(&display_id).copied().unwrap_or(now),
        }
    }

    /// The recorded down time for a display, if a gesture is open.
    #[must_use]
    pub fn get(&self, display_id: DisplayId) -> Option<u64> {
        self.entries.lock().get(&display_id).copied()
    }

    /// Forgets any open gesture on a display.
    pub fn clear(&self, display_id: DisplayId) { self.entries.lock().remove(&display_id); }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.lock().is_empty() }
}
