use std::time::{Duration, Instant};

/// Source of event timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds on the input dispatcher's uptime clock.
    fn uptime_millis(&self) -> u64;

    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration) { std::thread::sleep(duration); }
}

/// Monotonic clock anchored at construction.
///
/// Hosts that inject into the real dispatcher should supply a clock that
/// reads the platform uptime instead, so event times line up with its own.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    #[must_use]
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Default for MonotonicClock {
    fn default() -> Self { Self::new() }
}

impl Clock for MonotonicClock {
    fn uptime_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
