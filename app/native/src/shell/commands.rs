//! Builders for the `am`, `cmd` and `input` command lines used by the shell providers.
//!
//! Every value interpolated into a command is either numeric or validated
//! here first, so nothing user-supplied reaches the shell unquoted.

use crate::platform::{ComponentName, DisplayId, LaunchRequest, PlatformError, PlatformResult, TaskId};

/// Returns `true` for syntactically valid Android package names.
#[must_use]
pub fn is_valid_package(package: &str) -> bool {
    !package.is_empty()
        && !package.starts_with('.')
        && !package.ends_with('.')
        && package.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Rejects package names that are not safe to interpolate.
///
/// # Errors
///
/// Returns [`PlatformError::Rejected`] for invalid names.
pub fn checked_package(package: &str) -> PlatformResult<&str> {
    if is_valid_package(package) {
        Ok(package)
    } else {
        Err(PlatformError::rejected("validate package", format!("invalid package name '{package}'")))
    }
}

/// Quotes a component for `am start -n`, escaping `$` in inner-class names.
///
/// # Errors
///
/// Returns an error if the component contains characters outside a class name.
pub fn quoted_component(component: &ComponentName) -> PlatformResult<String> {
    checked_package(&component.package)?;
    let short = component.flatten_to_short_string();
    let class_ok = component
        .class
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$'));
    if !class_ok {
        return Err(PlatformError::rejected(
            "validate component",
            format!("invalid class name '{}'", component.class),
        ));
    }
    Ok(format!("\"{}\"", short.replace('$', "\\$")))
}

/// `am start` with explicit display, windowing mode and intent flags.
///
/// # Errors
///
/// Returns an error if the component is not safe to interpolate.
pub fn start_activity(request: &LaunchRequest) -> PlatformResult<String> {
    Ok(format!(
        "am start -n {} --display {} --windowingMode {} -f {}",
        quoted_component(&request.component)?,
        request.display_id,
        request.windowing_mode.code(),
        request.flags
    ))
}

/// `am start` that reuses an existing instance in a pane's display.
///
/// # Errors
///
/// Returns an error if the component is not safe to interpolate.
pub fn start_in_pane(component: &ComponentName, display_id: DisplayId) -> PlatformResult<String> {
    Ok(format!(
        "am start -n {} --display {display_id} --windowingMode 1 --activity-single-top \
         --activity-clear-top --activity-reorder-to-front",
        quoted_component(component)?
    ))
}

/// `am force-stop`.
///
/// # Errors
///
/// Returns an error if the package name is invalid.
pub fn force_stop(package: &str) -> PlatformResult<String> {
    Ok(format!("am force-stop {}", checked_package(package)?))
}

/// `cmd package resolve-activity` for the launcher entry point.
///
/// # Errors
///
/// Returns an error if the package name is invalid.
pub fn resolve_launcher(package: &str) -> PlatformResult<String> {
    Ok(format!(
        "cmd package resolve-activity --brief -a android.intent.action.MAIN \
         -c android.intent.category.LAUNCHER {}",
        checked_package(package)?
    ))
}

/// `am start` of the home activity on a display.
#[must_use]
pub fn start_home(display_id: DisplayId) -> String {
    format!(
        "am start --display {display_id} -a android.intent.action.MAIN \
         -c android.intent.category.HOME"
    )
}

pub const STACK_LIST: &str = "am stack list";

#[must_use]
pub fn stack_remove(stack_id: i32) -> String { format!("am stack remove {stack_id}") }

#[must_use]
pub fn stack_move_task(task_id: TaskId, stack_id: i32, to_front: bool) -> String {
    format!("am stack move-task {task_id} {stack_id} {to_front}")
}

#[must_use]
pub fn task_resizeable(task_id: TaskId, mode: i32) -> String {
    format!("am task resizeable {task_id} {mode}")
}

// ============================================================================
// input
// ============================================================================

#[must_use]
pub fn input_tap(display_id: DisplayId, x: f32, y: f32) -> String {
    format!("input -d {display_id} tap {} {}", px(x), px(y))
}

#[must_use]
pub fn input_swipe(
    display_id: DisplayId,
    from: (f32, f32),
    to: (f32, f32),
    duration_ms: u64,
) -> String {
    format!(
        "input -d {display_id} swipe {} {} {} {} {duration_ms}",
        px(from.0),
        px(from.1),
        px(to.0),
        px(to.1)
    )
}

#[must_use]
pub fn input_keyevent(display_id: DisplayId, key_code: i32) -> String {
    format!("input -d {display_id} keyevent {key_code}")
}

#[must_use]
pub fn input_motion(display_id: DisplayId, action: &str, x: f32, y: f32) -> String {
    format!("input -d {display_id} motionevent {action} {} {}", px(x), px(y))
}

#[allow(clippy::cast_possible_truncation)] // Screen coordinates fit comfortably in i32
fn px(value: f32) -> i32 { value.round() as i32 }
