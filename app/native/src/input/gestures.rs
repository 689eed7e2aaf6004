//! Gestures composed from single-pointer primitives.

use std::time::Duration;

use super::InputRouter;
use crate::platform::{DisplayId, MotionAction, Pointer};

fn send<R>(router: &R, display_id: DisplayId, action: MotionAction, x: f32, y: f32) -> bool
where R: InputRouter + ?Sized {
    router.inject_pointer(display_id, action, &[Pointer::finger(x, y)])
}

pub fn tap<R>(router: &R, display_id: DisplayId, x: f32, y: f32) -> bool
where R: InputRouter + ?Sized {
    send(router, display_id, MotionAction::Down, x, y)
        && send(router, display_id, MotionAction::Up, x, y)
}

/// Linear swipe. `steps` of zero is treated as one.
#[allow(clippy::cast_precision_loss)] // Step counts are tiny
pub fn swipe<R>(
    router: &R,
    display_id: DisplayId,
    from: (f32, f32),
    to: (f32, f32),
    duration: Duration,
    steps: u32,
) -> bool
where
    R: InputRouter + ?Sized,
{
    let steps = steps.max(1);
    let step_duration = duration / steps;

    if !send(router, display_id, MotionAction::Down, from.0, from.1) {
        return false;
    }

    for step in 1..=steps {
        router.pause(step_duration);
        let t = step as f32 / steps as f32;
        let x = from.0 + (to.0 - from.0) * t;
        let y = from.1 + (to.1 - from.1) * t;
        if !send(router, display_id, MotionAction::Move, x, y) {
            // Close the stream so the app is not left with a stuck pointer.
            send(router, display_id, MotionAction::Cancel, x, y);
            return false;
        }
    }

    send(router, display_id, MotionAction::Up, to.0, to.1)
}

pub fn long_press<R>(router: &R, display_id: DisplayId, x: f32, y: f32, hold: Duration) -> bool
where R: InputRouter + ?Sized {
    if !send(router, display_id, MotionAction::Down, x, y) {
        return false;
    }
    router.pause(hold);
    send(router, display_id, MotionAction::Up, x, y)
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(MotionAction, f32, f32)>>,
        pauses: Mutex<Vec<Duration>>,
        fail_on: Option<MotionAction>,
    }

    impl InputRouter for Recorder {
        fn inject_pointer(&self, _display_id: DisplayId, action: MotionAction, pointers: &[Pointer]) -> bool {
            let p = pointers[0].coords;
            self.events.lock().push((action, p.x, p.y));
            self.fail_on != Some(action)
        }

        fn inject_key(&self, _display_id: DisplayId, _key_code: i32) -> bool { true }

        fn pause(&self, duration: Duration) { self.pauses.lock().push(duration); }
    }

    fn actions(recorder: &Recorder) -> Vec<MotionAction> {
        recorder.events.lock().iter().map(|e| e.0).collect()
    }

    #[test]
    fn test_tap_is_down_then_up() {
        let recorder = Recorder::default();
        assert!(recorder.tap(1, 100.0, 200.0));
        assert_eq!(
            *recorder.events.lock(),
            vec![(MotionAction::Down, 100.0, 200.0), (MotionAction::Up, 100.0, 200.0)]
        );
    }

    #[test]
    fn test_swipe_interpolates_moves() {
        let recorder = Recorder::default();
        assert!(recorder.swipe(1, (0.0, 0.0), (100.0, 50.0), Duration::from_millis(100), 4));

        let events = recorder.events.lock().clone();
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], (MotionAction::Down, 0.0, 0.0));
        assert_eq!(events[1], (MotionAction::Move, 25.0, 12.5));
        assert_eq!(events[4], (MotionAction::Move, 100.0, 50.0));
        assert_eq!(events[5], (MotionAction::Up, 100.0, 50.0));
        assert_eq!(*recorder.pauses.lock(), vec![Duration::from_millis(25); 4]);
    }

    #[test]
    fn test_swipe_with_zero_steps_still_moves_once() {
        let recorder = Recorder::default();
        assert!(recorder.swipe(1, (0.0, 0.0), (10.0, 0.0), Duration::from_millis(10), 0));
        assert_eq!(actions(&recorder), vec![MotionAction::Down, MotionAction::Move, MotionAction::Up]);
    }

    #[test]
    fn test_failed_move_cancels_swipe() {
        let recorder = Recorder { fail_on: Some(MotionAction::Move), ..Recorder::default() };
        assert!(!recorder.swipe(1, (0.0, 0.0), (10.0, 0.0), Duration::ZERO, 3));
        assert_eq!(actions(&recorder), vec![MotionAction::Down, MotionAction::Move, MotionAction::Cancel]);
    }

    #[test]
    fn test_long_press_holds() {
        let recorder = Recorder::default();
        assert!(recorder.long_press(2, 5.0, 5.0, Duration::from_millis(800)));
        assert_eq!(actions(&recorder), vec![MotionAction::Down, MotionAction::Up]);
        assert_eq!(*recorder.pauses.lock(), vec![Duration::from_millis(800)]);
    }

    #[test]
    fn test_failed_down_aborts_gesture() {
        let recorder = Recorder { fail_on: Some(MotionAction::Down), ..Recorder::default() };
        assert!(!recorder.tap(1, 0.0, 0.0));
        assert!(!recorder.long_press(1, 0.0, 0.0, Duration::ZERO));
        assert_eq!(actions(&recorder), vec![MotionAction::Down, MotionAction::Down]);
        assert!(recorder.pauses.lock().is_empty());
    }
}
