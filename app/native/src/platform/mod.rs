//! Platform abstractions for `CarrotPlay`.
//!
//! This module defines the boundary between the launcher core and the
//! Android framework:
//!
//! - [`types`] - Display, task, motion and key value types
//! - [`backend`] - Capability traits implemented by privileged and shell providers
//! - [`events`] - Typed task-stack events and the sink that carries them
//! - [`capabilities`] - One-time provider selection
//! - [`error`] - The platform error taxonomy

pub mod backend;
pub mod capabilities;
pub mod error;
pub mod events;
pub mod thread;
pub mod types;

pub use backend::{DisplayBackend, InputBackend, TaskBackend};
pub use capabilities::{Capabilities, CapabilityReport, HostServices, Provider};
pub use error::{PlatformError, PlatformResult};
pub use events::{TaskEvent, TaskEventSink};
pub use types::{
    ComponentName, DEFAULT_DISPLAY, DisplayFlags, DisplayId, DisplaySpec, INVALID_DISPLAY,
    INVALID_TASK, KEY_FLAG_FROM_SYSTEM, KeyAction, KeyEvent, LaunchRequest, MotionAction,
    MotionEvent, Pointer, PointerCoords, PointerProperties, Pointers, SOURCE_KEYBOARD,
    SOURCE_TOUCHSCREEN, SurfaceHandle, TaskId, TaskRecord, ToolType, VIRTUAL_TOUCHSCREEN_ID,
    WindowingMode, intent_flags, keycode,
};
