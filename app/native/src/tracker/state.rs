//! State owned by the tracker actor.
//!
//! The foreground map is observable so that pane UIs can follow it without
//! polling; pending launches are private bookkeeping.

use std::collections::{BTreeMap, HashMap};

use eyeball::{Observable, Subscriber};

use crate::platform::DisplayId;

/// Display id to foreground package.
pub type ForegroundMap = BTreeMap<DisplayId, String>;

/// Per-display foreground packages and pending launch correlations.
///
/// Invariants:
/// - at most one package per display
/// - a package is foreground on at most one display
pub struct TrackerState {
    foreground: Observable<ForegroundMap>,
    pending: HashMap<DisplayId, String>,
}

impl Default for TrackerState {
    fn default() -> Self { Self::new() }
}

impl TrackerState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            foreground: Observable::new(ForegroundMap::new()),
            pending: HashMap::new(),
        }
    }

    // ========================================================================
    // Foreground map
    // ========================================================================

    /// The package recorded for `display_id`.
    #[must_use]
    pub fn foreground(&self, display_id: DisplayId) -> Option<&str> {
        Observable::get(&self.foreground).get(&display_id).map(String::as_str)
    }

    /// The display `package` is recorded on.
    #[must_use]
    pub fn display_of(&self, package: &str) -> Option<DisplayId> {
        Observable::get(&self.foreground)
            .iter()
            .find(|(_, recorded)| recorded.as_str() == package)
            .map(|(display_id, _)| *display_id)
    }

    #[must_use]
    pub fn snapshot(&self) -> ForegroundMap { Observable::get(&self.foreground).clone() }

    /// Subscribes to foreground map updates.
    #[must_use]
    pub fn subscribe(&self) -> Subscriber<ForegroundMap> { Observable::subscribe(&self.foreground) }

    fn modify(&mut self, f: impl FnOnce(&mut ForegroundMap) -> bool) -> bool {
        let mut next = Observable::get(&self.foreground).clone();
        let changed = f(&mut next);
        if changed {
            Observable::set(&mut self.foreground, next);
        }
        changed
    }

    /// Records `package` as foreground on `display_id`, removing it from any
    /// other display first.
    ///
    /// Returns `false` if it was already recorded there.
    pub fn record(&mut self, display_id: DisplayId, package: &str) -> bool {
        self.modify(|map| {
            if map.get(&display_id).is_some_and(|current| current == package) {
                return false;
            }
            map.retain(|_, recorded| recorded != package);
            map.insert(display_id, package.to_string());
            true
        })
    }

    /// Removes `package` from every display. Returns the displays it was on.
    pub fn remove_package(&mut self, package: &str) -> Vec<DisplayId> {
        self.remove_package_except(package, None)
    }

    /// Removes `package` from every display other than `keep`.
    pub fn remove_package_except(&mut self, package: &str, keep: Option<DisplayId>) -> Vec<DisplayId> {
        let mut removed = Vec::new();
        self.modify(|map| {
            map.retain(|display_id, recorded| {
                let drop = recorded == package && Some(*display_id) != keep;
                if drop {
                    removed.push(*display_id);
                }
                !drop
            });
            !removed.is_empty()
        });
        removed
    }

    /// Clears the record for `display_id`.
    pub fn clear_display(&mut self, display_id: DisplayId) -> Option<String> {
        let mut previous = None;
        self.modify(|map| {
            previous = map.remove(&display_id);
            previous.is_some()
        });
        previous
    }

    // ========================================================================
    // Pending launches
    // ========================================================================

    pub fn set_pending(&mut self, display_id: DisplayId, package: &str) {
        if let Some(replaced) = self.pending.insert(display_id, package.to_string())
            && replaced != package
        {
            tracing::debug!(display_id, replaced = %replaced, package, "pending launch superseded");
        }
    }

    #[must_use]
    pub fn pending(&self, display_id: DisplayId) -> Option<&str> {
        self.pending.get(&display_id).map(String::as_str)
    }

    pub fn take_pending(&mut self, display_id: DisplayId) -> Option<String> {
        self.pending.remove(&display_id)
    }

    /// Clears the pending entry only if it is still for `package`.
    pub fn take_pending_if(&mut self, display_id: DisplayId, package: &str) -> bool {
        if self.pending(display_id) == Some(package) {
            self.pending.remove(&display_id);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn pending_snapshot(&self) -> BTreeMap<DisplayId, String> {
        self.pending.iter().map(|(display_id, package)| (*display_id, package.clone())).collect()
    }

    /// Drops all state.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.modify(|map| {
            let changed = !map.is_empty();
            map.clear();
            changed
        });
    }
}
