//! Typed task-stack change events.
//!
//! The platform's task-stack listener (a dynamically implemented callback
//! interface on the privileged path, a polling diff on the shell path) is
//! adapted into [`TaskEvent`] values pushed through a [`TaskEventSink`].
//! The sink is the only thing a provider needs to know about the consumer.

use std::fmt;
use std::sync::Arc;

use super::types::{ComponentName, DisplayId, TaskId, TaskRecord};

/// A task-stack change reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    /// A task was created. Only the id and component are known at this point.
    TaskCreated {
        task_id: TaskId,
        component: ComponentName,
    },
    /// A task became the top task of its display.
    MovedToFront(TaskRecord),
    /// A task's label or icon changed.
    DescriptionChanged(TaskRecord),
    /// A task was moved behind the others on its display.
    MovedToBack(TaskRecord),
    /// A task is being removed.
    RemovalStarted(TaskRecord),
}

impl TaskEvent {
    /// Returns the event name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated { .. } => "TaskCreated",
            Self::MovedToFront(_) => "MovedToFront",
            Self::DescriptionChanged(_) => "DescriptionChanged",
            Self::MovedToBack(_) => "MovedToBack",
            Self::RemovalStarted(_) => "RemovalStarted",
        }
    }

    /// The id of the task the event is about.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        match self {
            Self::TaskCreated { task_id, .. } => *task_id,
            Self::MovedToFront(task)
            | Self::DescriptionChanged(task)
            | Self::MovedToBack(task)
            | Self::RemovalStarted(task) => task.task_id,
        }
    }

    /// The display the event refers to, when the event carries one.
    #[must_use]
    pub const fn display_id(&self) -> Option<DisplayId> {
        match self {
            Self::TaskCreated { .. } => None,
            Self::MovedToFront(task)
            | Self::DescriptionChanged(task)
            | Self::MovedToBack(task)
            | Self::RemovalStarted(task) => Some(task.display_id),
        }
    }
}

type Deliver = dyn Fn(TaskEvent) -> bool + Send + Sync;

/// Destination for task events.
///
/// Cheap to clone. Delivery must not block: the sink only enqueues onto the
/// consumer's serialized queue.
#[derive(Clone)]
pub struct TaskEventSink {
    deliver: Arc<Deliver>,
}

impl TaskEventSink {
    /// Creates a sink from a delivery function returning `false` once the
    /// consumer has gone away.
    pub fn new<F>(deliver: F) -> Self
    where F: Fn(TaskEvent) -> bool + Send + Sync + 'static {
        Self { deliver: Arc::new(deliver) }
    }

    /// Delivers an event. Returns `false` if the consumer is gone.
    pub fn deliver(&self, event: TaskEvent) -> bool { (self.deliver)(event) }
}

impl fmt::Debug for TaskEventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskEventSink").finish_non_exhaustive()
    }
}
