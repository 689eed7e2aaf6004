//! Task management through `am` and `cmd package`.
//!
//! Covers what an elevated shell can reach. Clearing focus and moving a root
//! task to the back have no shell equivalent and report
//! [`PlatformError::Unavailable`], which callers already treat as "try the
//! next fallback".

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use super::commands;
use super::executor::ShellExecutor;
use super::poller::TaskPoller;
use super::stack_list::{StackEntry, parse_stacks};
use crate::platform::backend::TaskBackend;
use crate::platform::events::TaskEventSink;
use crate::platform::{
    ComponentName, DisplayId, LaunchRequest, PlatformError, PlatformResult, TaskId, TaskRecord,
};

/// [`TaskBackend`] over an elevated shell.
pub struct ShellTaskBackend {
    shell: Arc<dyn ShellExecutor>,
    poll_interval: Duration,
    poller: Mutex<Option<TaskPoller>>,
}

impl ShellTaskBackend {
    #[must_use]
    pub fn new(shell: Arc<dyn ShellExecutor>, poll_interval: Duration) -> Self {
        Self {
            shell,
            poll_interval,
            poller: Mutex::new(None),
        }
    }

    fn stacks(&self) -> PlatformResult<Vec<StackEntry>> {
        parse_stacks(&self.shell.run(commands::STACK_LIST)?)
    }

    fn stack_of(&self, task_id: TaskId) -> PlatformResult<StackEntry> {
        self.stacks()?.into_iter().find(|stack| stack.contains_task(task_id)).ok_or_else(|| {
            PlatformError::rejected("find stack", format!("task {task_id} is not in any stack"))
        })
    }
}

impl TaskBackend for ShellTaskBackend {
    fn probe(&self) -> PlatformResult<()> {
        self.shell.run(commands::STACK_LIST).map(|_| ())
    }

    fn register_listener(&self, sink: TaskEventSink) -> PlatformResult<()> {
        let shell = Arc::clone(&self.shell);
        let snapshot = move || {
            let output = shell.run(commands::STACK_LIST)?;
            super::stack_list::parse_tasks(&output)
        };

        let poller = TaskPoller::start(snapshot, self.poll_interval, sink)?;
        // Replacing a previous poller drops and joins it.
        *self.poller.lock() = Some(poller);
        tracing::debug!(interval_ms = self.poll_interval.as_millis(), "task poller registered");
        Ok(())
    }

    fn unregister_listener(&self) -> PlatformResult<()> {
        if let Some(mut poller) = self.poller.lock().take() {
            poller.stop();
        }
        Ok(())
    }

    fn list_tasks(&self) -> PlatformResult<Vec<TaskRecord>> {
        Ok(self.stacks()?.into_iter().flat_map(|stack| stack.tasks).collect())
    }

    fn set_task_resizeable(&self, task_id: TaskId, mode: i32) -> PlatformResult<()> {
        self.shell.run(&commands::task_resizeable(task_id, mode)).map(|_| ())
    }

    fn set_focused_root_task(&self, task_id: TaskId) -> PlatformResult<()> {
        // Re-inserting a task at the top of its own stack brings the stack to front.
        let stack = self.stack_of(task_id)?;
        self.shell
            .run(&commands::stack_move_task(task_id, stack.stack_id, true))
            .map(|_| ())
    }

    fn set_focused_task(&self, _task_id: TaskId) -> PlatformResult<()> {
        Err(PlatformError::unavailable("set focused task"))
    }

    fn resolve_launcher_activity(&self, package: &str) -> PlatformResult<Option<ComponentName>> {
        let output = self.shell.run(&commands::resolve_launcher(package)?)?;
        Ok(output.lines().rev().find_map(ComponentName::parse))
    }

    fn start_activity(&self, request: &LaunchRequest) -> PlatformResult<()> {
        let command = commands::start_activity(request)?;
        let output = self.shell.run(&command)?;
        // `am start` exits 0 even when the launch was refused.
        if output.lines().any(|line| line.trim_start().starts_with("Error")) {
            return Err(PlatformError::rejected("start activity", output));
        }
        Ok(())
    }

    fn force_stop(&self, package: &str) -> PlatformResult<()> {
        self.shell.run(&commands::force_stop(package)?).map(|_| ())
    }

    fn remove_task(&self, task_id: TaskId) -> PlatformResult<()> {
        let stack = self.stack_of(task_id)?;
        self.shell.run(&commands::stack_remove(stack.stack_id)).map(|_| ())
    }

    fn move_root_task_to_back(&self, _task_id: TaskId) -> PlatformResult<()> {
        Err(PlatformError::unavailable("move root task to back"))
    }

    fn start_home_on_display(&self, display_id: DisplayId) -> PlatformResult<()> {
        self.shell.run(&commands::start_home(display_id)).map(|_| ())
    }
}

impl Drop for ShellTaskBackend {
    fn drop(&mut self) {
        if let Some(mut poller) = self.poller.get_mut().take() {
            poller.stop();
        }
    }
}
