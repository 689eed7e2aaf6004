//! Launch, stop and task management commands.
//!
//! Every command returns a plain `bool`: pane interactions degrade to
//! "nothing happened" instead of surfacing errors.

use super::TrackerEnv;
use crate::platform::{
    DEFAULT_DISPLAY, DisplayId, INVALID_DISPLAY, LaunchRequest, TaskRecord, WindowingMode,
    intent_flags,
};
use crate::shell::commands;
use crate::tracker::state::TrackerState;

/// Task id that clears the focused task.
const NO_FOCUSED_TASK: i32 = 0;

fn visible_task(env: &TrackerEnv, display_id: DisplayId) -> Option<TaskRecord> {
    env.backend.find_visible_task_on_display(display_id, None)
}

fn start(env: &TrackerEnv, package: &str, display_id: DisplayId, flags: u32) -> bool {
    let component = match env.backend.resolve_launcher_activity(package) {
        Ok(Some(component)) => component,
        Ok(None) => {
            tracing::warn!(package, "no launcher activity found");
            return false;
        }
        Err(err) => {
            tracing::warn!(package, error = %err, "failed to resolve launcher activity");
            return false;
        }
    };

    let request = LaunchRequest {
        component,
        display_id,
        windowing_mode: WindowingMode::Fullscreen,
        flags,
    };
    match env.backend.start_activity(&request) {
        Ok(()) => {
            tracing::info!(package, display_id, "app launch initiated");
            true
        }
        Err(err) => {
            tracing::warn!(package, display_id, error = %err, "failed to launch app");
            false
        }
    }
}

/// Launches `package` on a pane display.
///
/// An existing task for the package on that display is focused instead of
/// relaunched.
pub fn launch_on_display(
    state: &mut TrackerState,
    env: &TrackerEnv,
    package: &str,
    display_id: DisplayId,
) -> bool {
    if display_id == INVALID_DISPLAY {
        tracing::warn!(package, "refusing launch on invalid display");
        return false;
    }

    if let Some(existing) = env.backend.find_task_by_package_on_display(package, display_id) {
        if !existing.visible {
            env.focus_root_task(existing.task_id);
        }
        tracing::debug!(package, display_id, task_id = existing.task_id, "app already on display");
        return true;
    }

    if display_id != DEFAULT_DISPLAY {
        state.set_pending(display_id, package);
    }

    let launched = start(env, package, display_id, intent_flags::PANE_LAUNCH);
    if !launched {
        state.take_pending_if(display_id, package);
    }
    launched
}

/// Launches `package` fullscreen on the physical display.
///
/// Focus is forced after the pending timeout if the launch is never
/// confirmed by a moved-to-front event.
pub fn launch_fullscreen_on_main(
    state: &mut TrackerState,
    env: &TrackerEnv,
    package: &str,
    main_display: DisplayId,
) -> bool {
    if let Some(existing) = env.backend.find_task_by_package_on_display(package, main_display) {
        env.focus_root_task(existing.task_id);
        return true;
    }

    state.remove_package_except(package, Some(main_display));
    state.set_pending(main_display, package);

    if !start(env, package, main_display, intent_flags::FULLSCREEN_LAUNCH) {
        state.take_pending_if(main_display, package);
        return false;
    }

    env.schedule_pending_timeout(main_display, package);
    true
}

/// Stops every process of `package`, falling back to `am force-stop`.
pub fn force_stop(state: &mut TrackerState, env: &TrackerEnv, package: &str) -> bool {
    let stopped = match env.backend.force_stop(package) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(package, error = %err, "force stop failed, trying shell");
            env.shell.as_ref().is_some_and(|shell| {
                commands::force_stop(package)
                    .and_then(|command| shell.execute(&command))
                    .is_ok_and(|result| result.success)
            })
        }
    };

    if stopped {
        state.remove_package(package);
        tracing::info!(package, "app force stopped");
    }
    stopped
}

/// Removes every task on the display.
///
/// Returns `true` if at least one task was removed.
pub fn clear_display_tasks(state: &mut TrackerState, env: &TrackerEnv, display_id: DisplayId) -> bool {
    let tasks = match env.backend.list_tasks() {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(display_id, error = %err, "failed to list tasks");
            return false;
        }
    };

    let mut cleared = 0_usize;
    for task in tasks.iter().filter(|task| task.display_id == display_id) {
        match env.backend.remove_task(task.task_id) {
            Ok(()) => cleared += 1,
            Err(err) => tracing::warn!(task_id = task.task_id, error = %err, "failed to remove task"),
        }
    }

    state.clear_display(display_id);
    tracing::debug!(display_id, cleared, "display tasks cleared");
    cleared > 0
}

/// Sends the display's visible task behind the others, keeping its process.
pub fn move_task_to_back(env: &TrackerEnv, display_id: DisplayId) -> bool {
    let Some(task) = visible_task(env, display_id) else {
        return true;
    };
    match env.backend.move_root_task_to_back(task.task_id) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(display_id, task_id = task.task_id, error = %err, "failed to move task to back");
            false
        }
    }
}

/// Removes only the display's visible task.
pub fn remove_visible_task(state: &mut TrackerState, env: &TrackerEnv, display_id: DisplayId) -> bool {
    let Some(task) = visible_task(env, display_id) else {
        return true;
    };
    match env.backend.remove_task(task.task_id) {
        Ok(()) => {
            state.clear_display(display_id);
            true
        }
        Err(err) => {
            tracing::warn!(display_id, task_id = task.task_id, error = %err, "failed to remove visible task");
            false
        }
    }
}

/// Backgrounds the display's app without stopping it.
///
/// Focus is cleared first; then the root task is moved back, or home is
/// started on the display when that is refused.
pub fn send_to_background(env: &TrackerEnv, display_id: DisplayId) -> bool {
    let Some(task) = visible_task(env, display_id) else {
        return true;
    };

    if let Err(err) = env.backend.set_focused_task(NO_FOCUSED_TASK) {
        tracing::debug!(display_id, error = %err, "failed to clear focused task");
    }

    match env.backend.move_root_task_to_back(task.task_id) {
        Ok(()) => return true,
        Err(err) => tracing::debug!(display_id, task_id = task.task_id, error = %err, "move to back refused"),
    }

    match env.backend.start_home_on_display(display_id) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(display_id, error = %err, "failed to send app to background");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::fake::{FakeTasks, env, task};
    use super::*;
    use crate::platform::{PlatformResult, TaskBackend, TaskEvent};
    use crate::shell::{CommandResult, ShellExecutor};
    use crate::tracker::handlers::on_event;

    #[test]
    fn test_launch_on_invalid_display_fails() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();
        assert!(!launch_on_display(&mut state, &env, "com.app.a", INVALID_DISPLAY));
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn test_launch_creates_pending_then_moved_to_front_clears_it() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_on_display(&mut state, &env, "com.app.a", 7));
        assert_eq!(state.pending(7), Some("com.app.a"));
        assert_eq!(backend.calls(), vec!["start com.app.a/.Main 7"]);

        let launched = backend.find_task_by_package("com.app.a").unwrap();
        on_event(&mut state, &env, TaskEvent::MovedToFront(launched));
        assert_eq!(state.pending(7), None);
        assert_eq!(state.foreground(7), Some("com.app.a"));
    }

    #[test]
    fn test_launch_twice_keeps_single_task() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_on_display(&mut state, &env, "com.app.a", 7));
        assert!(launch_on_display(&mut state, &env, "com.app.a", 7));

        let tasks = backend.list_tasks().unwrap();
        assert_eq!(tasks.iter().filter(|t| t.package() == Some("com.app.a") && t.display_id == 7).count(), 1);
        assert_eq!(backend.count("start"), 1);
        // Already visible: no focus call either.
        assert_eq!(backend.count("focus_root"), 0);
    }

    #[test]
    fn test_launch_finds_existing_task_behind_other_display() {
        let backend = FakeTasks::with_tasks(vec![task(1, 0, "com.app.a", true), task(2, 7, "com.app.a", true)]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_on_display(&mut state, &env, "com.app.a", 7));
        assert_eq!(backend.count("start"), 0);
        assert_eq!(state.pending(7), None);
    }

    #[test]
    fn test_launch_focuses_hidden_existing_task() {
        let backend = FakeTasks::with_tasks(vec![task(12, 7, "com.app.a", false)]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_on_display(&mut state, &env, "com.app.a", 7));
        assert_eq!(backend.calls(), vec!["focus_root 12"]);
        assert_eq!(state.pending(7), None);
    }

    #[test]
    fn test_launch_on_default_display_has_no_pending() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend);
        let mut state = TrackerState::new();
        assert!(launch_on_display(&mut state, &env, "com.app.a", DEFAULT_DISPLAY));
        assert!(state.pending_snapshot().is_empty());
    }

    #[test]
    fn test_failed_launch_drops_pending() {
        let backend = FakeTasks::with_tasks(Vec::new());
        *backend.fail_start.lock() = true;
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(!launch_on_display(&mut state, &env, "com.app.a", 7));
        assert_eq!(state.pending(7), None);

        backend.unresolvable.lock().insert("com.app.b".to_string());
        assert!(!launch_on_display(&mut state, &env, "com.app.b", 7));
        assert_eq!(state.pending(7), None);
    }

    #[test]
    fn test_fullscreen_removes_package_from_panes() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();
        state.record(7, "com.app.a");

        assert!(launch_fullscreen_on_main(&mut state, &env, "com.app.a", 0));
        assert_eq!(state.foreground(7), None);
        assert_eq!(state.pending(0), Some("com.app.a"));
        assert_eq!(backend.calls(), vec!["start com.app.a/.Main 0"]);
    }

    #[test]
    fn test_fullscreen_focuses_existing_main_task() {
        let backend = FakeTasks::with_tasks(vec![task(12, 0, "com.app.a", true)]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_fullscreen_on_main(&mut state, &env, "com.app.a", 0));
        assert_eq!(backend.calls(), vec!["focus_root 12"]);
    }

    #[test]
    fn test_fullscreen_focuses_main_task_listed_after_pane_task() {
        let backend = FakeTasks::with_tasks(vec![task(12, 7, "com.app.a", true), task(13, 0, "com.app.a", false)]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();

        assert!(launch_fullscreen_on_main(&mut state, &env, "com.app.a", 0));
        assert_eq!(backend.calls(), vec!["focus_root 13"]);
    }

    struct OkShell;

    impl ShellExecutor for OkShell {
        fn execute(&self, _command: &str) -> PlatformResult<CommandResult> {
            Ok(CommandResult {
                success: true,
                exit_code: Some(0),
                output: String::new(),
                error: String::new(),
            })
        }

        fn execute_async(&self, _command: &str) -> PlatformResult<()> { Ok(()) }
    }

    #[test]
    fn test_force_stop_clears_foreground() {
        let backend = FakeTasks::with_tasks(Vec::new());
        let (env, _) = env(backend);
        let mut state = TrackerState::new();
        state.record(7, "com.app.a");

        assert!(force_stop(&mut state, &env, "com.app.a"));
        assert_eq!(state.foreground(7), None);
    }

    #[test]
    fn test_force_stop_falls_back_to_shell() {
        let backend = FakeTasks::with_tasks(Vec::new());
        *backend.fail_force_stop.lock() = true;
        let (mut env, _) = env(backend);
        let mut state = TrackerState::new();

        assert!(!force_stop(&mut state, &env, "com.app.a"));

        env.shell = Some(Arc::new(OkShell));
        state.record(7, "com.app.a");
        assert!(force_stop(&mut state, &env, "com.app.a"));
        assert!(state.snapshot().is_empty());
    }

    #[test]
    fn test_clear_display_removes_all_tasks_on_display() {
        let backend = FakeTasks::with_tasks(vec![
            task(12, 7, "com.app.a", true),
            task(13, 7, "com.app.b", false),
            task(14, 8, "com.app.c", true),
        ]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();
        state.record(7, "com.app.a");

        assert!(clear_display_tasks(&mut state, &env, 7));
        assert_eq!(backend.calls(), vec!["remove 12", "remove 13"]);
        assert_eq!(state.foreground(7), None);
        assert!(!clear_display_tasks(&mut state, &env, 7));
    }

    #[test]
    fn test_move_back_and_remove_visible() {
        let backend = FakeTasks::with_tasks(vec![task(12, 7, "com.app.a", true)]);
        let (env, _) = env(backend.clone());
        let mut state = TrackerState::new();
        state.record(7, "com.app.a");

        assert!(move_task_to_back(&env, 7));
        assert!(remove_visible_task(&mut state, &env, 7));
        assert_eq!(backend.calls(), vec!["move_back 12", "remove 12"]);
        assert_eq!(state.foreground(7), None);

        // Nothing left to act on.
        assert!(move_task_to_back(&env, 7));
        assert!(remove_visible_task(&mut state, &env, 7));
    }

    #[test]
    fn test_send_to_background_clears_focus_then_moves_back() {
        let backend = FakeTasks::with_tasks(vec![task(12, 7, "com.app.a", true)]);
        let (env, _) = env(backend.clone());

        assert!(send_to_background(&env, 7));
        assert_eq!(backend.calls(), vec!["focus 0", "move_back 12"]);
        assert!(send_to_background(&env, 9));
    }
}
