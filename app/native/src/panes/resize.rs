//! Debounced, single-flight display resizing.
//!
//! Resizing a virtual display is slow, and drags or animations request it
//! in bursts. Requests are tracked per slot:
//!
//! - A request waits for the debounce period. A newer request for the
//!   same slot supersedes it, so a burst collapses into its last request.
//! - When a request's debounce elapses while a resize for the slot is
//!   still running, it waits for the retry delay and checks again.
//! - At most one resize runs per slot at any time.
//!
//! Resizes run on the blocking pool.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;

use crate::config::ResizeConfig;
use crate::display::DisplaySurfaceCache;

/// Target size for one slot's display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub slot: u32,
    pub width: u32,
    pub height: u32,
    pub density: u32,
}

/// Applies resize requests.
pub trait ResizeTarget: Send + Sync {
    /// Resizes the display. Returns whether it succeeded.
    fn resize(&self, request: &ResizeRequest) -> bool;
}

impl ResizeTarget for DisplaySurfaceCache {
    fn resize(&self, request: &ResizeRequest) -> bool {
        Self::resize(self, request.slot, request.width, request.height, request.density)
    }
}

impl<F> ResizeTarget for F
where
    F: Fn(&ResizeRequest) -> bool + Send + Sync,
{
    fn resize(&self, request: &ResizeRequest) -> bool { self(request) }
}

#[derive(Debug, Default)]
struct SlotSchedule {
    /// Bumped by every request; a waiting request runs only if still current.
    generation: u64,
    in_flight: bool,
}

struct Shared {
    target: Arc<dyn ResizeTarget>,
    debounce: Duration,
    retry: Duration,
    slots: Mutex<HashMap<u32, SlotSchedule>>,
}

/// Per-slot resize scheduler. Cheap to clone.
#[derive(Clone)]
pub struct ResizeScheduler {
    shared: Arc<Shared>,
}

impl ResizeScheduler {
    #[must_use]
    pub fn new(target: Arc<dyn ResizeTarget>, config: &ResizeConfig) -> Self {
        Self::with_timing(target, config.debounce(), config.retry())
    }

    #[must_use]
    pub fn with_timing(target: Arc<dyn ResizeTarget>, debounce: Duration, retry: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                target,
                debounce,
                retry,
                slots: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Schedules `request`, superseding any request still waiting for the
    /// same slot.
    ///
    /// Without a tokio runtime the resize runs at once on the caller.
    pub fn request(&self, request: ResizeRequest) {
        let generation = {
            let mut slots = self.shared.slots.lock();
            let schedule = slots.entry(request.slot).or_default();
            schedule.generation = schedule.generation.wrapping_add(1);
            schedule.generation
        };

        let Ok(runtime) = Handle::try_current() else {
            self.run_now(request, generation);
            return;
        };

        tracing::trace!(
            slot = request.slot,
            width = request.width,
            height = request.height,
            "resize scheduled"
        );
        let shared = Arc::clone(&self.shared);
        runtime.spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            loop {
                match shared.claim(request.slot, generation) {
                    Claim::Superseded => return,
                    Claim::Busy => {
                        tracing::trace!(slot = request.slot, "resize in flight, retrying later");
                        tokio::time::sleep(shared.retry).await;
                    }
                    Claim::Acquired => break,
                }
            }

            let worker = Arc::clone(&shared);
            let outcome = tokio::task::spawn_blocking(move || worker.execute(&request)).await;
            if let Err(err) = outcome {
                tracing::warn!(slot = request.slot, error = %err, "resize task failed");
            }
            shared.release(request.slot);
        });
    }

    /// Whether a resize for `slot` is running right now.
    #[must_use]
    pub fn is_in_flight(&self, slot: u32) -> bool {
        self.shared.slots.lock().get(&slot).is_some_and(|schedule| schedule.in_flight)
    }

    /// Drops every waiting request. Running resizes finish.
    pub fn cancel_all(&self) {
        for schedule in self.shared.slots.lock().values_mut() {
            schedule.generation = schedule.generation.wrapping_add(1);
        }
    }

    fn run_now(&self, request: ResizeRequest, generation: u64) {
        if !matches!(self.shared.claim(request.slot, generation), Claim::Acquired) {
            return;
        }
        self.shared.execute(&request);
        self.shared.release(request.slot);
    }
}

enum Claim {
    Acquired,
    Busy,
    Superseded,
}

impl Shared {
    fn claim(&self, slot: u32, generation: u64) -> Claim {
        let mut slots = self.slots.lock();
        let schedule = slots.entry(slot).or_default();
        if schedule.generation != generation {
            Claim::Superseded
        } else if schedule.in_flight {
            Claim::Busy
        } else {
            schedule.in_flight = true;
            Claim::Acquired
        }
    }

    fn release(&self, slot: u32) {
        if let Some(schedule) = self.slots.lock().get_mut(&slot) {
            schedule.in_flight = false;
        }
    }

    fn execute(&self, request: &ResizeRequest) -> bool {
        let resized = self.target.resize(request);
        if resized {
            tracing::debug!(
                slot = request.slot,
                width = request.width,
                height = request.height,
                density = request.density,
                "display resized"
            );
        } else {
            tracing::warn!(slot = request.slot, "display resize failed");
        }
        resized
    }
}
