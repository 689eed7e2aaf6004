//! Capability provider traits.
//!
//! The rest of the crate depends only on these traits, never on which
//! provider is active. The embedding host implements them on top of the
//! privileged framework services; [`crate::shell`] implements the subset that
//! an elevated shell can reach.
//!
//! All methods are synchronous and may block on IPC or a subprocess. Call
//! them from worker threads or `spawn_blocking`, not from the control actor's
//! hot path when latency matters.

use super::error::PlatformResult;
use super::events::TaskEventSink;
use super::types::{
    ComponentName, DisplayId, DisplaySpec, KeyEvent, LaunchRequest, MotionEvent, SurfaceHandle,
    TaskId, TaskRecord,
};

/// Virtual display management.
pub trait DisplayBackend: Send + Sync {
    /// Feature probe run once at startup.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unavailable`](super::PlatformError::Unavailable)
    /// if displays cannot be created by this process.
    fn probe(&self) -> PlatformResult<()>;

    /// Creates a virtual display, optionally rendering into `surface` from the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses to create the display.
    fn create_display(
        &self,
        spec: &DisplaySpec,
        surface: Option<&SurfaceHandle>,
    ) -> PlatformResult<DisplayId>;

    /// Changes the logical size of an existing display in place.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::StaleDisplay`](super::PlatformError::StaleDisplay)
    /// if the display was released.
    fn resize_display(
        &self,
        display_id: DisplayId,
        width: u32,
        height: u32,
        density: u32,
    ) -> PlatformResult<()>;

    /// Points the display at a new surface, or at none.
    ///
    /// # Errors
    ///
    /// Returns an error if the display was released.
    fn set_surface(&self, display_id: DisplayId, surface: Option<&SurfaceHandle>)
    -> PlatformResult<()>;

    /// Powers the display on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the display was released.
    fn set_display_power(&self, display_id: DisplayId, on: bool) -> PlatformResult<()>;

    /// Destroys the display.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform fails to release it.
    fn release_display(&self, display_id: DisplayId) -> PlatformResult<()>;
}

/// Raw event injection into the input dispatcher.
pub trait InputBackend: Send + Sync {
    /// Feature probe run once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the injection entry point is missing or denied.
    fn probe(&self) -> PlatformResult<()>;

    /// Injects a motion event without waiting for dispatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the event was rejected.
    fn inject_motion(&self, event: &MotionEvent) -> PlatformResult<()>;

    /// Injects a key event without waiting for dispatch.
    ///
    /// # Errors
    ///
    /// Returns an error if the event was rejected.
    fn inject_key(&self, event: &KeyEvent) -> PlatformResult<()>;

    /// Blocks until the compositor has committed pending input transactions.
    ///
    /// # Errors
    ///
    /// Returns an error if the barrier could not be issued.
    fn sync_input_transactions(&self) -> PlatformResult<()>;
}

/// Activity task management.
pub trait TaskBackend: Send + Sync {
    /// Feature probe run once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if task management is unavailable.
    fn probe(&self) -> PlatformResult<()>;

    /// Starts delivering task-stack events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener could not be registered.
    fn register_listener(&self, sink: TaskEventSink) -> PlatformResult<()>;

    /// Stops delivering task-stack events.
    ///
    /// # Errors
    ///
    /// Returns an error if unregistering failed.
    fn unregister_listener(&self) -> PlatformResult<()>;

    /// Lists every root task across all displays.
    ///
    /// # Errors
    ///
    /// Returns an error if the task list could not be read.
    fn list_tasks(&self) -> PlatformResult<Vec<TaskRecord>>;

    /// Sets a task's resize mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn set_task_resizeable(&self, task_id: TaskId, mode: i32) -> PlatformResult<()>;

    /// Gives input and window focus to a root task.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn set_focused_root_task(&self, task_id: TaskId) -> PlatformResult<()>;

    /// Gives focus to a task; `0` clears focus.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn set_focused_task(&self, task_id: TaskId) -> PlatformResult<()>;

    /// Resolves a package's launcher activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the package manager could not be queried.
    fn resolve_launcher_activity(&self, package: &str) -> PlatformResult<Option<ComponentName>>;

    /// Starts an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the launch was rejected.
    fn start_activity(&self, request: &LaunchRequest) -> PlatformResult<()>;

    /// Kills every process of a package.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn force_stop(&self, package: &str) -> PlatformResult<()>;

    /// Removes a task and finishes its activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn remove_task(&self, task_id: TaskId) -> PlatformResult<()>;

    /// Moves a root task behind all others on its display.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn move_root_task_to_back(&self, task_id: TaskId) -> PlatformResult<()>;

    /// Starts the home activity on a display.
    ///
    /// # Errors
    ///
    /// Returns an error if the call was rejected.
    fn start_home_on_display(&self, display_id: DisplayId) -> PlatformResult<()>;

    // ========================================================================
    // Provided lookups
    // ========================================================================

    /// Finds a task by id, including nested child tasks.
    fn find_task_by_id(&self, task_id: TaskId) -> Option<TaskRecord> {
        self.list_tasks().ok()?.into_iter().find(|task| task.contains_task(task_id))
    }

    /// Finds the first task whose component belongs to `package`.
    fn find_task_by_package(&self, package: &str) -> Option<TaskRecord> {
        self.list_tasks().ok()?.into_iter().find(|task| task.package() == Some(package))
    }

    /// Finds the task for `package` on `display_id`.
    fn find_task_by_package_on_display(&self, package: &str, display_id: DisplayId) -> Option<TaskRecord> {
        self.list_tasks()
            .ok()?
            .into_iter()
            .find(|task| task.display_id == display_id && task.package() == Some(package))
    }

    /// Finds a visible task on `display_id`, skipping `exclude`.
    fn find_visible_task_on_display(
        &self,
        display_id: DisplayId,
        exclude: Option<TaskId>,
    ) -> Option<TaskRecord> {
        self.list_tasks().ok()?.into_iter().find(|task| {
            task.display_id == display_id && task.visible && Some(task.task_id) != exclude
        })
    }
}
