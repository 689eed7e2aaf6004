//! Input through the `input` command.
//!
//! Slower than direct injection and limited to what `input` understands:
//! single-pointer motion events and the built-in tap, swipe and keyevent
//! gestures. Used when no privileged input backend is available.

use std::sync::Arc;
use std::time::Duration;

use super::commands;
use super::executor::ShellExecutor;
use crate::input::InputRouter;
use crate::platform::{DisplayId, MotionAction, Pointer};

/// [`InputRouter`] over an elevated shell.
pub struct ShellInput {
    shell: Arc<dyn ShellExecutor>,
}

impl ShellInput {
    #[must_use]
    pub fn new(shell: Arc<dyn ShellExecutor>) -> Self { Self { shell } }

    fn run(&self, command: &str) -> bool {
        match self.shell.execute(command) {
            Ok(result) if result.success => true,
            Ok(result) => {
                tracing::debug!(command, exit_code = ?result.exit_code, stderr = %result.error, "shell input failed");
                false
            }
            Err(err) => {
                tracing::debug!(command, error = %err, "shell input failed");
                false
            }
        }
    }
}

impl InputRouter for ShellInput {
    fn inject_pointer(&self, display_id: DisplayId, action: MotionAction, pointers: &[Pointer]) -> bool {
        let (Some(name), Some(pointer)) = (action.shell_name(), pointers.first()) else {
            tracing::trace!(display_id, %action, "action not supported by shell input");
            return false;
        };

        // Motion streams go through the ordered session so samples are not
        // reordered by independent process spawns.
        let command = commands::input_motion(display_id, name, pointer.coords.x, pointer.coords.y);
        match self.shell.execute_async(&command) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(display_id, error = %err, "shell motion event not queued");
                false
            }
        }
    }

    fn inject_key(&self, display_id: DisplayId, key_code: i32) -> bool {
        self.run(&commands::input_keyevent(display_id, key_code))
    }

    fn tap(&self, display_id: DisplayId, x: f32, y: f32) -> bool {
        self.run(&commands::input_tap(display_id, x, y))
    }

    fn swipe(
        &self,
        display_id: DisplayId,
        from: (f32, f32),
        to: (f32, f32),
        duration: Duration,
        _steps: u32,
    ) -> bool {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.run(&commands::input_swipe(display_id, from, to, millis))
    }

    fn long_press(&self, display_id: DisplayId, x: f32, y: f32, hold: Duration) -> bool {
        // A swipe that does not move is a long press.
        self.swipe(display_id, (x, y), (x, y), hold, 1)
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::platform::PlatformResult;
    use crate::shell::executor::CommandResult;

    #[derive(Default)]
    struct RecordingShell {
        sync: Mutex<Vec<String>>,
        queued: Mutex<Vec<String>>,
    }

    impl ShellExecutor for RecordingShell {
        fn execute(&self, command: &str) -> PlatformResult<CommandResult> {
            self.sync.lock().push(command.to_string());
            Ok(CommandResult { success: true, exit_code: Some(0), ..CommandResult::default() })
        }

        fn execute_async(&self, command: &str) -> PlatformResult<()> {
            self.queued.lock().push(command.to_string());
            Ok(())
        }
    }

    fn input() -> (Arc<RecordingShell>, ShellInput) {
        let shell = Arc::new(RecordingShell::default());
        (shell.clone(), ShellInput::new(shell))
    }

    #[test]
    fn test_gestures_use_native_input_commands() {
        let (shell, input) = input();
        assert!(input.tap(5, 10.0, 20.0));
        assert!(input.swipe(5, (0.0, 0.0), (100.0, 0.0), Duration::from_millis(250), 10));
        assert!(input.long_press(5, 7.0, 8.0, Duration::from_millis(800)));
        assert!(input.send_back(5));
        assert!(input.send_home(5));

        assert_eq!(
            *shell.sync.lock(),
            vec![
                "input -d 5 tap 10 20",
                "input -d 5 swipe 0 0 100 0 250",
                "input -d 5 swipe 7 8 7 8 800",
                "input -d 5 keyevent 4",
                "input -d 5 keyevent 3",
            ]
        );
    }

    #[test]
    fn test_pointer_events_are_queued() {
        let (shell, input) = input();
        assert!(input.inject_pointer(2, MotionAction::Down, &[Pointer::finger(1.0, 2.0)]));
        assert!(input.inject_pointer(2, MotionAction::Up, &[Pointer::finger(1.0, 2.0)]));
        assert_eq!(
            *shell.queued.lock(),
            vec!["input -d 2 motionevent DOWN 1 2", "input -d 2 motionevent UP 1 2"]
        );
    }

    #[test]
    fn test_unsupported_actions_fail() {
        let (shell, input) = input();
        assert!(!input.inject_pointer(2, MotionAction::Scroll, &[Pointer::finger(0.0, 0.0)]));
        assert!(!input.inject_pointer(2, MotionAction::Down, &[]));
        assert!(shell.queued.lock().is_empty());
    }
}
