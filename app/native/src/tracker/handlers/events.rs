//! Task-stack event handlers.

use super::TrackerEnv;
use crate::platform::{ComponentName, DisplayId, TaskEvent, TaskId, TaskRecord};
use crate::tracker::messages::TrackerNotification;
use crate::tracker::state::TrackerState;

/// Dispatches one task event.
pub fn on_event(state: &mut TrackerState, env: &TrackerEnv, event: TaskEvent) {
    tracing::trace!(event = event.name(), task_id = event.task_id(), "task event");
    match event {
        TaskEvent::TaskCreated { task_id, component } => {
            on_task_created(state, env, task_id, &component);
        }
        TaskEvent::MovedToFront(task) => on_moved_to_front(state, env, &task),
        TaskEvent::DescriptionChanged(task) => on_description_changed(state, env, &task),
        TaskEvent::MovedToBack(task) => on_moved_to_back(state, env, &task),
        TaskEvent::RemovalStarted(task) => on_removal_started(state, env, &task),
    }
}

/// Makes the new task resizeable, then records it on its display.
pub fn on_task_created(
    state: &mut TrackerState,
    env: &TrackerEnv,
    task_id: TaskId,
    component: &ComponentName,
) {
    tracing::debug!(task_id, component = %component, "task created");

    if let Err(err) = env.backend.set_task_resizeable(task_id, env.settings.resizeable_mode) {
        tracing::warn!(task_id, error = %err, "failed to make task resizeable");
    }

    match env.backend.find_task_by_id(task_id) {
        Some(task) => {
            on_task_changed(state, env, &component.package, task.display_id);
        }
        None => tracing::debug!(task_id, "created task not found in task list"),
    }
}

/// Records the task, then resolves any pending launch on its display.
pub fn on_moved_to_front(state: &mut TrackerState, env: &TrackerEnv, task: &TaskRecord) {
    let Some(package) = task.package() else {
        return;
    };
    let display_id = task.display_id;
    tracing::debug!(task_id = task.task_id, display_id, package, "task moved to front");

    on_task_changed(state, env, package, display_id);

    match state.take_pending(display_id) {
        Some(pending) if pending == package => {
            // Virtual displays do not receive focus on their own.
            env.focus_root_task(task.task_id);
            tracing::debug!(display_id, package, "pending launch confirmed");
        }
        Some(pending) => {
            tracing::debug!(display_id, pending = %pending, package, "pending launch cleared by another task");
        }
        None => {}
    }
}

pub fn on_description_changed(state: &mut TrackerState, env: &TrackerEnv, task: &TaskRecord) {
    if !task.visible {
        return;
    }
    if let Some(package) = task.package() {
        on_task_changed(state, env, package, task.display_id);
    }
}

/// Records whichever task is now visible on the display, if any.
pub fn on_moved_to_back(state: &mut TrackerState, env: &TrackerEnv, task: &TaskRecord) {
    let display_id = task.display_id;
    tracing::debug!(task_id = task.task_id, display_id, "task moved to back");

    let uncovered = env.backend.find_visible_task_on_display(display_id, Some(task.task_id));
    if let Some(package) = uncovered.as_ref().and_then(TaskRecord::package) {
        on_task_changed(state, env, package, display_id);
    }
}

/// Clears the display once its last visible task is going away.
pub fn on_removal_started(state: &mut TrackerState, env: &TrackerEnv, task: &TaskRecord) {
    let display_id = task.display_id;
    tracing::debug!(task_id = task.task_id, display_id, "task removal started");

    if env.backend.find_visible_task_on_display(display_id, Some(task.task_id)).is_some() {
        return;
    }
    state.clear_display(display_id);
    env.notify(TrackerNotification::AppClosed { display_id });
}

/// Records `package` as foreground on `display_id`.
///
/// Returns `false` when it already was.
pub fn on_task_changed(
    state: &mut TrackerState,
    env: &TrackerEnv,
    package: &str,
    display_id: DisplayId,
) -> bool {
    if !state.record(display_id, package) {
        return false;
    }
    tracing::info!(display_id, package, "foreground app changed");
    env.notify(TrackerNotification::AppChanged { display_id, package: package.to_string() });
    true
}

/// Forces focus when a pending launch was never confirmed.
pub fn on_pending_timeout(
    state: &mut TrackerState,
    env: &TrackerEnv,
    display_id: DisplayId,
    package: &str,
) {
    if !state.take_pending_if(display_id, package) {
        return;
    }
    tracing::debug!(display_id, package, "pending launch timed out, forcing focus");
    match env.backend.find_task_by_package_on_display(package, display_id) {
        Some(task) => {
            env.focus_root_task(task.task_id);
        }
        None => tracing::warn!(display_id, package, "no task found for timed out launch"),
    }
}
