//! Platform value types shared by every capability provider.
//!
//! These mirror the shapes the Android framework uses (display ids, task
//! records, motion and key events, launch requests) without binding to any
//! particular way of reaching the framework.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Platform-assigned display identifier.
pub type DisplayId = i32;

/// Platform-assigned task identifier.
pub type TaskId = i32;

/// Sentinel for "no display".
pub const INVALID_DISPLAY: DisplayId = -1;

/// The physical display.
pub const DEFAULT_DISPLAY: DisplayId = 0;

/// Sentinel for "no task".
pub const INVALID_TASK: TaskId = -1;

// ============================================================================
// Components and Tasks
// ============================================================================

/// A fully-qualified activity component (`package/class`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentName {
    /// Owning package name.
    pub package: String,
    /// Fully-qualified class name.
    pub class: String,
}

impl ComponentName {
    /// Creates a component, expanding a leading `.` in the class name.
    #[must_use]
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        let package = package.into();
        let class = class.into();
        let class = if class.starts_with('.') { format!("{package}{class}") } else { class };
        Self { package, class }
    }

    /// Parses the `package/class` form used by `am` and `pm`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (package, class) = value.trim().split_once('/')?;
        if package.is_empty() || class.is_empty() {
            return None;
        }
        Some(Self::new(package, class))
    }

    /// Returns the short `package/.Class` form when the class lives in the package.
    #[must_use]
    pub fn flatten_to_short_string(&self) -> String {
        match self.class.strip_prefix(self.package.as_str()) {
            Some(rest) if rest.starts_with('.') => format!("{}/{rest}", self.package),
            _ => format!("{}/{}", self.package, self.class),
        }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.flatten_to_short_string())
    }
}

/// A snapshot of one task as reported by the platform.
///
/// Always queried live; never cached beyond the handler that read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub display_id: DisplayId,
    pub top_component: Option<ComponentName>,
    pub base_component: Option<ComponentName>,
    pub num_activities: u32,
    pub visible: bool,
    /// Ids of tasks nested under this root task.
    pub child_task_ids: SmallVec<[TaskId; 2]>,
}

impl Default for TaskRecord {
    fn default() -> Self {
        Self {
            task_id: INVALID_TASK,
            display_id: DEFAULT_DISPLAY,
            top_component: None,
            base_component: None,
            // An unreadable count is treated as "can go back".
            num_activities: 2,
            visible: false,
            child_task_ids: SmallVec::new(),
        }
    }
}

impl TaskRecord {
    /// The component identifying this task: top activity first, then base.
    #[must_use]
    pub fn component(&self) -> Option<&ComponentName> {
        self.top_component.as_ref().or(self.base_component.as_ref())
    }

    /// The package owning this task, if known.
    #[must_use]
    pub fn package(&self) -> Option<&str> { self.component().map(|c| c.package.as_str()) }

    /// Returns `true` if this task or one of its children has the given id.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task_id == task_id || self.child_task_ids.contains(&task_id)
    }
}

// ============================================================================
// Virtual Displays
// ============================================================================

/// Virtual display creation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayFlags(u32);

impl DisplayFlags {
    /// Other apps may show content on the display.
    pub const PUBLIC: Self = Self(1);
    /// Only content explicitly placed on the display is shown; no mirroring.
    pub const OWN_CONTENT_ONLY: Self = Self(1 << 3);
    /// System-trusted display; required to host arbitrary activities.
    pub const TRUSTED: Self = Self(1 << 10);

    /// Flags used for every pane display.
    pub const PANE: Self = Self(Self::PUBLIC.0 | Self::OWN_CONTENT_ONLY.0 | Self::TRUSTED.0);

    /// Returns the raw bit set.
    #[must_use]
    pub const fn bits(self) -> u32 { self.0 }

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool { self.0 & other.0 == other.0 }
}

impl std::ops::BitOr for DisplayFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self { Self(self.0 | rhs.0) }
}

/// Parameters for creating a virtual display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySpec {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub density: u32,
    pub flags: DisplayFlags,
}

/// An opaque handle to a compositor surface owned by the UI layer.
///
/// The UI layer invalidates the handle when the surface is destroyed; the
/// display cache refuses to attach invalid handles.
#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    id: u64,
    valid: Arc<AtomicBool>,
}

impl SurfaceHandle {
    /// Creates a valid handle with the given host-side id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            valid: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Host-side surface id.
    #[must_use]
    pub const fn id(&self) -> u64 { self.id }

    /// Returns `true` while the surface can be rendered into.
    #[must_use]
    pub fn is_valid(&self) -> bool { self.valid.load(Ordering::Acquire) }

    /// Marks the surface as destroyed. Shared by every clone.
    pub fn invalidate(&self) { self.valid.store(false, Ordering::Release); }
}

impl PartialEq for SurfaceHandle {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for SurfaceHandle {}

// ============================================================================
// Input Events
// ============================================================================

/// Input source: touchscreen.
pub const SOURCE_TOUCHSCREEN: u32 = 0x0000_1002;

/// Input source: keyboard.
pub const SOURCE_KEYBOARD: u32 = 0x0000_0101;

/// Key event flag marking system-originated events.
pub const KEY_FLAG_FROM_SYSTEM: u32 = 0x8;

/// Device id used for every injected event.
///
/// Not a real device, so injected streams never merge with the physical
/// touchscreen's concurrent reports.
pub const VIRTUAL_TOUCHSCREEN_ID: i32 = -1;

/// Android key codes used by panes.
pub mod keycode {
    pub const HOME: i32 = 3;
    pub const BACK: i32 = 4;
    pub const APP_SWITCH: i32 = 187;
}

/// Masked motion action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum MotionAction {
    Down,
    Up,
    Move,
    Cancel,
    Outside,
    PointerDown,
    PointerUp,
    HoverMove,
    Scroll,
    HoverEnter,
    HoverExit,
}

impl MotionAction {
    /// Every action, in framework code order.
    pub const ALL: [Self; 11] = [
        Self::Down,
        Self::Up,
        Self::Move,
        Self::Cancel,
        Self::Outside,
        Self::PointerDown,
        Self::PointerUp,
        Self::HoverMove,
        Self::Scroll,
        Self::HoverEnter,
        Self::HoverExit,
    ];

    /// Framework action code (`MotionEvent.ACTION_*`).
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Down => 0,
            Self::Up => 1,
            Self::Move => 2,
            Self::Cancel => 3,
            Self::Outside => 4,
            Self::PointerDown => 5,
            Self::PointerUp => 6,
            Self::HoverMove => 7,
            Self::Scroll => 8,
            Self::HoverEnter => 9,
            Self::HoverExit => 10,
        }
    }

    /// Parses a masked framework action code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.code() == code & 0xff)
    }

    /// Name accepted by `input motionevent`, for the actions it supports.
    #[must_use]
    pub const fn shell_name(self) -> Option<&'static str> {
        match self {
            Self::Down | Self::PointerDown => Some("DOWN"),
            Self::Up | Self::PointerUp => Some("UP"),
            Self::Move | Self::HoverMove => Some("MOVE"),
            Self::Cancel => Some("CANCEL"),
            _ => None,
        }
    }
}

impl fmt::Display for MotionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self:?}") }
}

/// Tool that produced a pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolType {
    Unknown,
    #[default]
    Finger,
    Stylus,
    Mouse,
    Eraser,
}

/// Per-pointer identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerProperties {
    pub id: i32,
    pub tool_type: ToolType,
}

/// Per-pointer sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerCoords {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub size: f32,
    pub touch_major: f32,
    pub touch_minor: f32,
    pub tool_major: f32,
    pub tool_minor: f32,
    pub orientation: f32,
}

impl PointerCoords {
    /// A fingertip sample at `(x, y)` with unit pressure and size.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            pressure: 1.0,
            size: 1.0,
            touch_major: 0.0,
            touch_minor: 0.0,
            tool_major: 0.0,
            tool_minor: 0.0,
            orientation: 0.0,
        }
    }
}

/// One pointer in a motion event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub properties: PointerProperties,
    pub coords: PointerCoords,
}

impl Pointer {
    /// A single finger pointer with id 0.
    #[must_use]
    pub const fn finger(x: f32, y: f32) -> Self {
        Self {
            properties: PointerProperties { id: 0, tool_type: ToolType::Finger },
            coords: PointerCoords::at(x, y),
        }
    }
}

/// Pointer list; two inline slots cover single touch and pinch.
pub type Pointers = SmallVec<[Pointer; 2]>;

/// A fully-specified motion event ready for injection.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub display_id: DisplayId,
    /// Uptime milliseconds of the gesture's initial DOWN.
    pub down_time: u64,
    /// Uptime milliseconds of this sample.
    pub event_time: u64,
    pub action: MotionAction,
    /// Index of the pointer that changed, for `PointerDown`/`PointerUp`.
    pub action_index: u8,
    pub pointers: Pointers,
    pub device_id: i32,
    pub source: u32,
}

impl MotionEvent {
    /// Framework action code including the pointer index bits.
    #[must_use]
    pub const fn action_code(&self) -> i32 { self.action.code() | ((self.action_index as i32) << 8) }
}

/// Key event direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Down,
    Up,
}

/// A fully-specified key event ready for injection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub display_id: DisplayId,
    pub down_time: u64,
    pub event_time: u64,
    pub action: KeyAction,
    pub key_code: i32,
    pub flags: u32,
    pub source: u32,
    pub device_id: i32,
}

// ============================================================================
// Launching
// ============================================================================

/// Activity windowing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowingMode {
    Undefined,
    Fullscreen,
    Pinned,
    Freeform,
}

impl WindowingMode {
    /// Framework windowing mode constant.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Undefined => 0,
            Self::Fullscreen => 1,
            Self::Pinned => 2,
            Self::Freeform => 5,
        }
    }
}

/// Intent flags used when starting pane activities.
pub mod intent_flags {
    pub const NEW_TASK: u32 = 0x1000_0000;
    pub const MULTIPLE_TASK: u32 = 0x0800_0000;
    pub const CLEAR_TOP: u32 = 0x0400_0000;
    pub const SINGLE_TOP: u32 = 0x2000_0000;
    pub const NO_HISTORY: u32 = 0x4000_0000;
    pub const EXCLUDE_FROM_RECENTS: u32 = 0x0080_0000;
    pub const RESET_TASK_IF_NEEDED: u32 = 0x0020_0000;
    pub const REORDER_TO_FRONT: u32 = 0x0002_0000;
    pub const LAUNCH_ADJACENT: u32 = 0x0000_1000;

    /// Launching into a pane's virtual display.
    pub const PANE_LAUNCH: u32 = NEW_TASK
        | MULTIPLE_TASK
        | RESET_TASK_IF_NEEDED
        | LAUNCH_ADJACENT
        | EXCLUDE_FROM_RECENTS
        | NO_HISTORY;

    /// Launching fullscreen on the physical display.
    pub const FULLSCREEN_LAUNCH: u32 = NEW_TASK | MULTIPLE_TASK | CLEAR_TOP | LAUNCH_ADJACENT;
}

/// A request to start an activity on a specific display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub component: ComponentName,
    pub display_id: DisplayId,
    pub windowing_mode: WindowingMode,
    pub flags: u32,
}
