//! Task-stack change detection by polling.
//!
//! Without a privileged listener the shell provider snapshots the task list
//! on an interval and diffs consecutive snapshots into the same
//! [`TaskEvent`]s the platform listener would have delivered.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::platform::events::{TaskEvent, TaskEventSink};
use crate::platform::thread::spawn_named_thread;
use crate::platform::{DisplayId, PlatformError, PlatformResult, TaskId, TaskRecord};

/// Diffs two task snapshots (both front to back) into task events.
///
/// Events come out in this order: removals, creations, front changes per
/// display (the new front task, then the old one if it is no longer
/// visible), then top-activity changes of surviving tasks.
#[must_use]
pub fn diff_snapshots(prev: &[TaskRecord], next: &[TaskRecord]) -> Vec<TaskEvent> {
    let prev_ids: HashSet<TaskId> = prev.iter().map(|t| t.task_id).collect();
    let next_ids: HashSet<TaskId> = next.iter().map(|t| t.task_id).collect();
    let mut events = Vec::new();

    events.extend(
        prev.iter()
            .filter(|t| !next_ids.contains(&t.task_id))
            .map(|t| TaskEvent::RemovalStarted(t.clone())),
    );

    events.extend(next.iter().filter(|t| !prev_ids.contains(&t.task_id)).filter_map(|t| {
        t.component().map(|component| TaskEvent::TaskCreated {
            task_id: t.task_id,
            component: component.clone(),
        })
    }));

    let mut seen = HashSet::new();
    let displays: Vec<DisplayId> =
        next.iter().map(|t| t.display_id).filter(|d| seen.insert(*d)).collect();
    for display_id in displays {
        let Some(front) = front_task(next, display_id) else {
            continue;
        };
        let prev_front = front_task(prev, display_id);
        if prev_front.is_some_and(|p| p.task_id == front.task_id) {
            continue;
        }
        events.push(TaskEvent::MovedToFront(front.clone()));

        if let Some(old) = prev_front.and_then(|p| next.iter().find(|t| t.task_id == p.task_id))
            && !old.visible
        {
            events.push(TaskEvent::MovedToBack(old.clone()));
        }
    }

    for task in next {
        let Some(before) = prev.iter().find(|t| t.task_id == task.task_id) else {
            continue;
        };
        if before.top_component != task.top_component && task.top_component.is_some() {
            events.push(TaskEvent::DescriptionChanged(task.clone()));
        }
    }

    events
}

fn front_task(tasks: &[TaskRecord], display_id: DisplayId) -> Option<&TaskRecord> {
    tasks.iter().find(|t| t.display_id == display_id && t.visible)
}

/// Background thread that polls the task list and feeds a [`TaskEventSink`].
pub struct TaskPoller {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TaskPoller {
    /// Starts polling `snapshot` every `interval`.
    ///
    /// The first snapshot is taken immediately and used as the baseline, so
    /// tasks that already exist produce no events. Polling stops on its own
    /// once the sink reports that its consumer is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the polling thread could not be spawned.
    pub fn start<F>(mut snapshot: F, interval: Duration, sink: TaskEventSink) -> PlatformResult<Self>
    where F: FnMut() -> PlatformResult<Vec<TaskRecord>> + Send + 'static {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = spawn_named_thread("task-poller", move || {
            let mut prev = snapshot().unwrap_or_default();

            loop {
                thread::park_timeout(interval);
                if stop_flag.load(Ordering::Acquire) {
                    break;
                }

                let next = match snapshot() {
                    Ok(tasks) => tasks,
                    Err(err) => {
                        tracing::debug!(error = %err, "task poll failed");
                        continue;
                    }
                };

                for event in diff_snapshots(&prev, &next) {
                    tracing::trace!(event = event.name(), task_id = event.task_id(), "polled task event");
                    if !sink.deliver(event) {
                        tracing::debug!("task event consumer gone, stopping poller");
                        return;
                    }
                }
                prev = next;
            }
        })
        .ok_or_else(|| PlatformError::unavailable("task poller thread"))?;

        Ok(Self { stop, handle: Some(handle) })
    }

    /// Stops polling and joins the thread.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::error!("task poller thread panicked");
            }
        }
    }
}

impl Drop for TaskPoller {
    fn drop(&mut self) { self.stop(); }
}
