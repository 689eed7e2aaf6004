use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, MonotonicClock};
use super::down_time::DownTimeMap;
use super::sync::SyncPolicy;
use super::touch::normalize;
use super::InputRouter;
use crate::platform::backend::InputBackend;
use crate::platform::{
    DisplayId, KEY_FLAG_FROM_SYSTEM, KeyAction, KeyEvent, MotionAction, MotionEvent, Pointer,
    PlatformResult, SOURCE_KEYBOARD, SOURCE_TOUCHSCREEN, VIRTUAL_TOUCHSCREEN_ID,
};

/// Injects fully-formed events through a privileged [`InputBackend`].
pub struct InputInjector {
    backend: Arc<dyn InputBackend>,
    clock: Arc<dyn Clock>,
    sync: SyncPolicy,
    down_times: DownTimeMap,
}

impl InputInjector {
    #[must_use]
    pub fn new(backend: Arc<dyn InputBackend>, sync: SyncPolicy) -> Self {
        Self::with_clock(backend, sync, Arc::new(MonotonicClock::new()))
    }

    #[must_use]
    pub fn with_clock(backend: Arc<dyn InputBackend>, sync: SyncPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            sync,
            down_times: DownTimeMap::new(),
        }
    }

    #[must_use]
    pub const fn sync_policy(&self) -> &SyncPolicy { &self.sync }

    #[must_use]
    pub const fn down_times(&self) -> &DownTimeMap { &self.down_times }

    /// Builds the event that [`InputRouter::inject_pointer`] would send,
    /// updating the down-time bookkeeping.
    pub fn build_motion(
        &self,
        display_id: DisplayId,
        action: MotionAction,
        pointers: &[Pointer],
    ) -> MotionEvent {
        let now = self.clock.uptime_millis();
        let down_time = self.down_times.resolve(display_id, action, now);

        MotionEvent {
            display_id,
            down_time,
            event_time: now,
            action,
            action_index: 0,
            pointers: pointers
                .iter()
                .map(|pointer| Pointer {
                    properties: pointer.properties,
                    coords: normalize(pointer.coords),
                })
                .collect(),
            device_id: VIRTUAL_TOUCHSCREEN_ID,
            source: SOURCE_TOUCHSCREEN,
        }
    }

    fn sync_transactions(&self) {
        if let Err(err) = self.backend.sync_input_transactions() {
            tracing::debug!(error = %err, "input transaction sync failed");
        }
    }

    fn report(result: PlatformResult<()>, display_id: DisplayId, what: &str) -> bool {
        match result {
            Ok(()) => true,
            Err(err) if err.is_stale() => {
                tracing::debug!(display_id, error = %err, "{what} dropped for stale display");
                false
            }
            Err(err) => {
                tracing::warn!(display_id, error = %err, "{what} injection failed");
                false
            }
        }
    }

    fn key_event(&self, display_id: DisplayId, key_code: i32, action: KeyAction, down_time: u64) -> KeyEvent {
        KeyEvent {
            display_id,
            down_time,
            event_time: self.clock.uptime_millis(),
            action,
            key_code,
            flags: KEY_FLAG_FROM_SYSTEM,
            source: SOURCE_KEYBOARD,
            device_id: VIRTUAL_TOUCHSCREEN_ID,
        }
    }
}

impl InputRouter for InputInjector {
    fn inject_pointer(&self, display_id: DisplayId, action: MotionAction, pointers: &[Pointer]) -> bool {
        if pointers.is_empty() {
            return false;
        }

        let event = self.build_motion(display_id, action, pointers);

        if self.sync.sync_before(action) {
            self.sync_transactions();
        }

        tracing::trace!(display_id, %action, down_time = event.down_time, "injecting motion");
        let injected = Self::report(self.backend.inject_motion(&event), display_id, "motion");

        if injected && self.sync.sync_after(action) {
            self.sync_transactions();
        }

        injected
    }

    fn inject_key(&self, display_id: DisplayId, key_code: i32) -> bool {
        let down_time = self.clock.uptime_millis();
        let down = self.key_event(display_id, key_code, KeyAction::Down, down_time);

        tracing::trace!(display_id, key_code, "injecting key");
        if !Self::report(self.backend.inject_key(&down), display_id, "key") {
            return false;
        }

        let up = self.key_event(display_id, key_code, KeyAction::Up, down_time);
        Self::report(self.backend.inject_key(&up), display_id, "key")
    }

    fn pause(&self, duration: Duration) { self.clock.sleep(duration); }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::platform::{PlatformError, keycode};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Sync,
        Motion(MotionEvent),
        Key(KeyEvent),
    }

    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<Call>>,
        stale: bool,
    }

    impl InputBackend for RecordingBackend {
        fn probe(&self) -> PlatformResult<()> { Ok(()) }

        fn inject_motion(&self, event: &MotionEvent) -> PlatformResult<()> {
            if self.stale {
                return Err(PlatformError::StaleDisplay { display_id: event.display_id });
            }
            self.calls.lock().push(Call::Motion(event.clone()));
            Ok(())
        }

        fn inject_key(&self, event: &KeyEvent) -> PlatformResult<()> {
            self.calls.lock().push(Call::Key(event.clone()));
            Ok(())
        }

        fn sync_input_transactions(&self) -> PlatformResult<()> {
            self.calls.lock().push(Call::Sync);
            Ok(())
        }
    }

    /// Advances only when slept on, so timestamps are deterministic.
    #[derive(Default)]
    struct ManualClock(AtomicU64);

    impl Clock for ManualClock {
        fn uptime_millis(&self) -> u64 { self.0.load(Ordering::SeqCst) }

        fn sleep(&self, duration: Duration) {
            self.0.fetch_add(u64::try_from(duration.as_millis()).unwrap(), Ordering::SeqCst);
        }
    }

    fn injector(backend: &Arc<RecordingBackend>) -> (InputInjector, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let injector = InputInjector::with_clock(backend.clone(), SyncPolicy::default(), clock.clone());
        (injector, clock)
    }

    fn finger(x: f32, y: f32) -> [Pointer; 1] { [Pointer::finger(x, y)] }

    #[test]
    fn test_tap_shares_down_time_and_clears_map() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, clock) = injector(&backend);
        clock.sleep(Duration::from_millis(1000));

        assert!(injector.inject_pointer(5, MotionAction::Down, &finger(100.0, 200.0)));
        clock.sleep(Duration::from_millis(40));
        assert!(injector.inject_pointer(5, MotionAction::Up, &finger(100.0, 200.0)));

        let motions: Vec<MotionEvent> = backend
            .calls
            .lock()
            .iter()
            .filter_map(|c| if let Call::Motion(m) = c { Some(m.clone()) } else { None })
            .collect();
        assert_eq!(motions.len(), 2);
        assert_eq!(motions[0].down_time, 1000);
        assert_eq!(motions[1].down_time, 1000);
        assert_eq!(motions[1].event_time, 1040);
        assert!(motions.iter().all(|m| m.display_id == 5));
        assert!(motions.iter().all(|m| m.device_id == VIRTUAL_TOUCHSCREEN_ID));
        assert!(injector.down_times().is_empty());
    }

    #[test]
    fn test_sync_policy_around_gesture() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, _) = injector(&backend);

        injector.inject_pointer(1, MotionAction::Down, &finger(0.0, 0.0));
        injector.inject_pointer(1, MotionAction::Move, &finger(1.0, 0.0));
        injector.inject_pointer(1, MotionAction::Move, &finger(2.0, 0.0));
        injector.inject_pointer(1, MotionAction::Up, &finger(2.0, 0.0));

        let shape: Vec<&str> = backend
            .calls
            .lock()
            .iter()
            .map(|c| match c {
                Call::Sync => "sync",
                Call::Motion(m) => match m.action {
                    MotionAction::Down => "down",
                    MotionAction::Move => "move",
                    MotionAction::Up => "up",
                    _ => "other",
                },
                Call::Key(_) => "key",
            })
            .collect();
        assert_eq!(shape, vec!["down", "sync", "move", "sync", "move", "sync", "up", "sync"]);
    }

    #[test]
    fn test_zero_pressure_is_normalized() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, _) = injector(&backend);
        let mut pointer = Pointer::finger(1.0, 1.0);
        pointer.coords.pressure = 0.0;
        pointer.coords.size = 0.0;

        let event = injector.build_motion(2, MotionAction::Down, &[pointer]);
        assert!((event.pointers[0].coords.pressure - 1.0).abs() < f32::EPSILON);
        assert!((event.pointers[0].coords.size - 1.0).abs() < f32::EPSILON);
        assert_eq!(event.source, SOURCE_TOUCHSCREEN);
    }

    #[test]
    fn test_key_is_down_then_up_from_system() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, _) = injector(&backend);

        assert!(injector.send_back(3));

        let calls = backend.calls.lock();
        assert_eq!(calls.len(), 2);
        let (Call::Key(down), Call::Key(up)) = (&calls[0], &calls[1]) else {
            panic!("expected two key events, got {calls:?}");
        };
        assert_eq!(down.action, KeyAction::Down);
        assert_eq!(up.action, KeyAction::Up);
        assert_eq!(down.key_code, keycode::BACK);
        assert_eq!(down.display_id, 3);
        assert_eq!(down.flags & KEY_FLAG_FROM_SYSTEM, KEY_FLAG_FROM_SYSTEM);
        assert_eq!(down.source, SOURCE_KEYBOARD);
        assert_eq!(down.down_time, up.down_time);
    }

    #[test]
    fn test_stale_display_fails_quietly_without_post_sync() {
        let backend = Arc::new(RecordingBackend { stale: true, ..RecordingBackend::default() });
        let (injector, _) = injector(&backend);

        assert!(!injector.inject_pointer(9, MotionAction::Up, &finger(0.0, 0.0)));
        // Only the pre-sync ran.
        assert_eq!(*backend.calls.lock(), vec![Call::Sync]);
    }

    #[test]
    fn test_empty_pointer_list_is_rejected() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, _) = injector(&backend);
        assert!(!injector.inject_pointer(1, MotionAction::Down, &[]));
        assert!(backend.calls.lock().is_empty());
    }

    #[test]
    fn test_long_press_uses_clock_for_hold() {
        let backend = Arc::new(RecordingBackend::default());
        let (injector, clock) = injector(&backend);

        assert!(injector.long_press(1, 5.0, 5.0, Duration::from_millis(800)));
        assert_eq!(clock.uptime_millis(), 800);
    }
}
