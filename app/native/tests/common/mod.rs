//! Shared in-memory providers for the integration tests.
//!
//! Each fake records the calls it receives so tests can assert on what the
//! core asked the platform to do.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use carrotplay_lib::input::InputRouter;
use carrotplay_lib::platform::{
    ComponentName, DisplayBackend, DisplayId, DisplaySpec, LaunchRequest, MotionAction, PlatformError,
    PlatformResult, Pointer, SurfaceHandle, TaskBackend, TaskEvent, TaskEventSink, TaskId, TaskRecord,
};
use parking_lot::Mutex;

// ============================================================================
// Tasks
// ============================================================================

/// Builds a task record whose top activity is `package/.Main`.
pub fn task(task_id: TaskId, display_id: DisplayId, package: &str, visible: bool) -> TaskRecord {
    TaskRecord {
        task_id,
        display_id,
        top_component: Some(ComponentName::new(package, ".Main")),
        visible,
        ..TaskRecord::default()
    }
}

/// Task backend over an in-memory task list.
///
/// Starting an activity puts a new visible task on top of its display.
/// The registered listener is kept so tests can push events the way the
/// platform would.
pub struct FakeTasks {
    tasks: Mutex<Vec<TaskRecord>>,
    calls: Mutex<Vec<String>>,
    sink: Mutex<Option<TaskEventSink>>,
    next_id: AtomicI32,
}

impl FakeTasks {
    pub fn new(tasks: Vec<TaskRecord>) -> Arc<Self> {
        Arc::new(Self {
            tasks: Mutex::new(tasks),
            calls: Mutex::new(Vec::new()),
            sink: Mutex::new(None),
            next_id: AtomicI32::new(100),
        })
    }

    pub fn calls(&self) -> Vec<String> { self.calls.lock().clone() }

    pub fn has_call(&self, call: &str) -> bool { self.calls.lock().iter().any(|c| c == call) }

    pub fn tasks(&self) -> Vec<TaskRecord> { self.tasks.lock().clone() }

    pub fn is_listening(&self) -> bool { self.sink.lock().is_some() }

    /// Delivers an event through the registered listener.
    pub fn emit(&self, event: TaskEvent) -> bool {
        let sink = self.sink.lock().clone();
        sink.is_some_and(|sink| sink.deliver(event))
    }

    fn record(&self, call: String) { self.calls.lock().push(call); }
}

impl TaskBackend for FakeTasks {
    fn probe(&self) -> PlatformResult<()> { Ok(()) }

    fn register_listener(&self, sink: TaskEventSink) -> PlatformResult<()> {
        *self.sink.lock() = Some(sink);
        Ok(())
    }

    fn unregister_listener(&self) -> PlatformResult<()> {
        self.record("unregister".to_string());
        *self.sink.lock() = None;
        Ok(())
    }

    fn list_tasks(&self) -> PlatformResult<Vec<TaskRecord>> { Ok(self.tasks.lock().clone()) }

    fn set_task_resizeable(&self, task_id: TaskId, mode: i32) -> PlatformResult<()> {
        self.record(format!("resizeable {task_id} {mode}"));
        Ok(())
    }

    fn set_focused_root_task(&self, task_id: TaskId) -> PlatformResult<()> {
        self.record(format!("focus_root {task_id}"));
        Ok(())
    }

    fn set_focused_task(&self, task_id: TaskId) -> PlatformResult<()> {
        self.record(format!("focus {task_id}"));
        Ok(())
    }

    fn resolve_launcher_activity(&self, package: &str) -> PlatformResult<Option<ComponentName>> {
        if package.starts_with("missing.") {
            return Ok(None);
        }
        Ok(Some(ComponentName::new(package, ".Main")))
    }

    fn start_activity(&self, request: &LaunchRequest) -> PlatformResult<()> {
        self.record(format!("start {} {}", request.component, request.display_id));
        if request.component.package.starts_with("denied.") {
            return Err(PlatformError::rejected("start activity", "denied"));
        }
        let task_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut tasks = self.tasks.lock();
        for existing in tasks.iter_mut().filter(|t| t.display_id == request.display_id) {
            existing.visible = false;
        }
        tasks.insert(0, task(task_id, request.display_id, &request.component.package, true));
        Ok(())
    }

    fn force_stop(&self, package: &str) -> PlatformResult<()> {
        self.record(format!("force_stop {package}"));
        self.tasks.lock().retain(|t| t.package() != Some(package));
        Ok(())
    }

    fn remove_task(&self, task_id: TaskId) -> PlatformResult<()> {
        self.record(format!("remove {task_id}"));
        self.tasks.lock().retain(|t| t.task_id != task_id);
        Ok(())
    }

    fn move_root_task_to_back(&self, task_id: TaskId) -> PlatformResult<()> {
        self.record(format!("move_back {task_id}"));
        Ok(())
    }

    fn start_home_on_display(&self, display_id: DisplayId) -> PlatformResult<()> {
        self.record(format!("home {display_id}"));
        Ok(())
    }
}

// ============================================================================
// Displays
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Create { name: String, width: u32, height: u32 },
    Resize { id: DisplayId, width: u32, height: u32 },
    Surface { id: DisplayId, surface: Option<u64> },
    Power { id: DisplayId, on: bool },
    Release { id: DisplayId },
}

/// Display backend handing out ids from 20 upwards.
#[derive(Default)]
pub struct FakeDisplays {
    next_id: AtomicI32,
    calls: Mutex<Vec<DisplayCall>>,
}

impl FakeDisplays {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn calls(&self) -> Vec<DisplayCall> { self.calls.lock().clone() }

    pub fn count(&self, matches: impl Fn(&DisplayCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| matches(call)).count()
    }
}

impl DisplayBackend for FakeDisplays {
    fn probe(&self) -> PlatformResult<()> { Ok(()) }

    fn create_display(&self, spec: &DisplaySpec, _surface: Option<&SurfaceHandle>) -> PlatformResult<DisplayId> {
        self.calls.lock().push(DisplayCall::Create {
            name: spec.name.clone(),
            width: spec.width,
            height: spec.height,
        });
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 20)
    }

    fn resize_display(&self, id: DisplayId, width: u32, height: u32, _density: u32) -> PlatformResult<()> {
        self.calls.lock().push(DisplayCall::Resize { id, width, height });
        Ok(())
    }

    fn set_surface(&self, id: DisplayId, surface: Option<&SurfaceHandle>) -> PlatformResult<()> {
        self.calls.lock().push(DisplayCall::Surface { id, surface: surface.map(SurfaceHandle::id) });
        Ok(())
    }

    fn set_display_power(&self, id: DisplayId, on: bool) -> PlatformResult<()> {
        self.calls.lock().push(DisplayCall::Power { id, on });
        Ok(())
    }

    fn release_display(&self, id: DisplayId) -> PlatformResult<()> {
        self.calls.lock().push(DisplayCall::Release { id });
        Ok(())
    }
}

// ============================================================================
// Input
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum InputCall {
    Pointer { display: DisplayId, action: MotionAction, x: f32, y: f32 },
    Key { display: DisplayId, code: i32 },
}

/// Input router that records what it was asked to inject.
#[derive(Default)]
pub struct RecordingInput {
    calls: Mutex<Vec<InputCall>>,
}

impl RecordingInput {
    pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

    pub fn calls(&self) -> Vec<InputCall> { self.calls.lock().clone() }
}

impl InputRouter for RecordingInput {
    fn inject_pointer(&self, display_id: DisplayId, action: MotionAction, pointers: &[Pointer]) -> bool {
        let Some(first) = pointers.first() else {
            return false;
        };
        self.calls.lock().push(InputCall::Pointer {
            display: display_id,
            action,
            x: first.coords.x,
            y: first.coords.y,
        });
        true
    }

    fn inject_key(&self, display_id: DisplayId, key_code: i32) -> bool {
        self.calls.lock().push(InputCall::Key { display: display_id, code: key_code });
        true
    }

    fn pause(&self, _duration: std::time::Duration) {}
}
