//! Live task lookups.

use super::TrackerEnv;
use crate::platform::DisplayId;

/// Package of the visible task on the display.
pub fn top_activity(env: &TrackerEnv, display_id: DisplayId) -> Option<String> {
    let tasks = env
        .backend
        .list_tasks()
        .inspect_err(|err| tracing::debug!(display_id, error = %err, "failed to list tasks"))
        .ok()?;

    tasks
        .iter()
        .filter(|task| task.display_id == display_id && task.visible)
        .find_map(|task| task.package().map(str::to_string))
}

/// Whether BACK on the display would stay inside the app.
///
/// A single activity means BACK would close the app. Undeterminable cases
/// answer `true`.
pub fn can_go_back(env: &TrackerEnv, display_id: DisplayId) -> bool {
    let Ok(tasks) = env.backend.list_tasks() else {
        return true;
    };
    tasks
        .iter()
        .find(|task| task.display_id == display_id && task.visible)
        .is_none_or(|task| task.num_activities > 1)
}
