//! When to wait for the compositor around injected events.
//!
//! Syncing before an event makes sure the window it targets has been laid
//! out; syncing after a gesture-ending event makes sure the app saw the end
//! of the stream before anything else is injected.

use crate::config::InputConfig;
use crate::platform::MotionAction;

/// A set of motion actions, stored as a bit per action code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionSet(u16);

impl ActionSet {
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn with(self, action: MotionAction) -> Self {
        Self(self.0 | (1 << action.code()))
    }

    #[must_use]
    pub const fn contains(self, action: MotionAction) -> bool {
        self.0 & (1 << action.code()) != 0
    }
}

impl FromIterator<MotionAction> for ActionSet {
    fn from_iter<I: IntoIterator<Item = MotionAction>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Which actions get an input-transaction sync before and after injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    pub before: ActionSet,
    pub after: ActionSet,
}

impl SyncPolicy {
    /// A policy that never syncs.
    pub const NONE: Self = Self { before: ActionSet::EMPTY, after: ActionSet::EMPTY };

    #[must_use]
    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            before: config.sync_before.iter().copied().collect(),
            after: config.sync_after.iter().copied().collect(),
        }
    }

    #[must_use]
    pub const fn sync_before(&self, action: MotionAction) -> bool { self.before.contains(action) }

    #[must_use]
    pub const fn sync_after(&self, action: MotionAction) -> bool { self.after.contains(action) }
}

impl Default for SyncPolicy {
    fn default() -> Self { Self::from_config(&InputConfig::default()) }
}
