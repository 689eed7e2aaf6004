//! Parser for `am stack list` output.
//!
//! The command prints one header per root task (named `Stack` on older
//! releases, `RootTask` on newer ones) followed by indented task lines:
//!
//! ```text
//! RootTask id=12 bounds=[0,0][800,600] displayId=7 userId=0
//!   taskId=12: com.app.a/.MainActivity bounds=[0,0][800,600] userId=0 visible=true topActivity=ComponentInfo{com.app.a/com.app.a.MainActivity}
//! ```
//!
//! Root tasks are listed front to back within each display. The activity
//! count is not printed, so parsed records keep the permissive default.

use std::sync::LazyLock;

use regex::Regex;

use crate::platform::{ComponentName, DisplayId, PlatformError, PlatformResult, TaskId, TaskRecord};

/// A root task (stack) and the tasks nested in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    pub stack_id: i32,
    pub display_id: DisplayId,
    pub tasks: Vec<TaskRecord>,
}

impl StackEntry {
    /// Returns `true` if the stack holds the given task.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.stack_id == task_id || self.tasks.iter().any(|task| task.task_id == task_id)
    }
}

/// Line patterns, compiled once per process.
struct Patterns {
    header: Regex,
    task: Regex,
    visible: Regex,
    top: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        Ok(Self {
            header: Regex::new(r"^\s*(?:RootTask|Stack)\s+id=(-?\d+)\b.*?\bdisplayId=(-?\d+)")?,
            task: Regex::new(r"^\s*taskId=(-?\d+):\s+(\S+)")?,
            visible: Regex::new(r"\bvisible=(true|false)\b")?,
            top: Regex::new(r"\btopActivity=ComponentInfo\{([^}]+)\}")?,
        })
    }
}

static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

fn patterns() -> PlatformResult<&'static Patterns> {
    PATTERNS.as_ref().map_err(|err| PlatformError::rejected("parse stack list", err.to_string()))
}

/// Parses `am stack list` output into stacks, preserving order.
///
/// # Errors
///
/// Returns an error only if the line patterns failed to compile.
pub fn parse_stacks(output: &str) -> PlatformResult<Vec<StackEntry>> {
    let Patterns { header, task, visible, top } = patterns()?;

    let mut stacks: Vec<StackEntry> = Vec::new();

    for line in output.lines() {
        if let Some(caps) = header.captures(line) {
            stacks.push(StackEntry {
                stack_id: caps[1].parse().unwrap_or(-1),
                display_id: caps[2].parse().unwrap_or(0),
                tasks: Vec::new(),
            });
            continue;
        }

        let Some(caps) = task.captures(line) else {
            continue;
        };
        let Some(stack) = stacks.last_mut() else {
            continue;
        };

        let task_id = caps[1].parse().unwrap_or(-1);
        let base_component = ComponentName::parse(&caps[2]);
        let top_component = top.captures(line).and_then(|c| ComponentName::parse(&c[1]));
        let is_visible = visible.captures(line).is_some_and(|c| &c[1] == "true");

        stack.tasks.push(TaskRecord {
            task_id,
            display_id: stack.display_id,
            top_component,
            base_component,
            visible: is_visible,
            ..TaskRecord::default()
        });
    }

    // Nested tasks are children of their root task.
    for stack in &mut stacks {
        let children: Vec<TaskId> = stack
            .tasks
            .iter()
            .map(|t| t.task_id)
            .filter(|id| *id != stack.stack_id)
            .collect();
        if let Some(root) = stack.tasks.iter_mut().find(|t| t.task_id == stack.stack_id) {
            root.child_task_ids.extend(children);
        }
    }

    Ok(stacks)
}

/// Parses `am stack list` output into a flat, front-to-back task list.
///
/// # Errors
///
/// Returns an error only if the internal patterns fail to compile.
pub fn parse_tasks(output: &str) -> PlatformResult<Vec<TaskRecord>> {
    Ok(parse_stacks(output)?.into_iter().flat_map(|stack| stack.tasks).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANDROID_12: &str = "\
RootTask id=12 bounds=[0,0][800,600] displayId=7 userId=0
  configuration={1.0 ?mcc?mnc [en_US] ldltr sw600dp w800dp h600dp 160dpi}
  taskId=12: com.app.a/.MainActivity bounds=[0,0][800,600] userId=0 visible=true topActivity=ComponentInfo{com.app.a/com.app.a.DetailActivity}
RootTask id=1 bounds=[0,0][1920,720] displayId=0 userId=0
  taskId=1: com.android.launcher3/.Launcher bounds=[0,0][1920,720] userId=0 visible=false topActivity=ComponentInfo{com.android.launcher3/com.android.launcher3.Launcher}
  taskId=3: com.car.nav/.Nav bounds=[0,0][1920,720] userId=0 visible=true
";

    const ANDROID_10: &str = "\
Stack id=4 bounds=[0,0][1080,1920] displayId=0 userId=0
  configuration={1.0 310mcc260mnc [en_US] ldltr}
  taskId=4: com.music.player/.Main bounds=[0,0][1080,1920] userId=0 visible=true topActivity=ComponentInfo{com.music.player/com.music.player.Main}
";

    #[test]
    fn test_parse_root_task_format() {
        let stacks = parse_stacks(ANDROID_12).unwrap();
        assert_eq!(stacks.len(), 2);

        let pane = &stacks[0];
        assert_eq!(pane.stack_id, 12);
        assert_eq!(pane.display_id, 7);
        assert_eq!(pane.tasks.len(), 1);

        let task = &pane.tasks[0];
        assert_eq!(task.task_id, 12);
        assert_eq!(task.display_id, 7);
        assert!(task.visible);
        assert_eq!(task.package(), Some("com.app.a"));
        assert_eq!(
            task.top_component.as_ref().unwrap().class,
            "com.app.a.DetailActivity"
        );
        assert_eq!(task.base_component.as_ref().unwrap().class, "com.app.a.MainActivity");
        assert_eq!(task.num_activities, 2);
    }

    #[test]
    fn test_parse_nested_tasks_become_children() {
        let stacks = parse_stacks(ANDROID_12).unwrap();
        let main = &stacks[1];
        assert_eq!(main.tasks.len(), 2);
        assert_eq!(main.tasks[0].child_task_ids.as_slice(), &[3]);
        assert!(main.contains_task(3));
        assert!(!main.contains_task(12));
    }

    #[test]
    fn test_task_without_top_activity_falls_back_to_base() {
        let tasks = parse_tasks(ANDROID_12).unwrap();
        let nav = tasks.iter().find(|t| t.task_id == 3).unwrap();
        assert!(nav.top_component.is_none());
        assert_eq!(nav.package(), Some("com.car.nav"));
        assert!(nav.visible);
    }

    #[test]
    fn test_parse_legacy_stack_format() {
        let tasks = parse_tasks(ANDROID_10).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].task_id, 4);
        assert_eq!(tasks[0].display_id, 0);
        assert_eq!(tasks[0].package(), Some("com.music.player"));
    }

    #[test]
    fn test_parse_preserves_front_to_back_order() {
        let ids: Vec<TaskId> = parse_tasks(ANDROID_12).unwrap().iter().map(|t| t.task_id).collect();
        assert_eq!(ids, vec![12, 1, 3]);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(parse_tasks("").unwrap().is_empty());
        assert!(parse_tasks("Error: permission denied\n").unwrap().is_empty());
        // Task lines before any header are ignored.
        assert!(parse_tasks("  taskId=9: com.x/.Y visible=true\n").unwrap().is_empty());
    }

    #[test]
    fn test_patterns_are_compiled_once() {
        let first = patterns().unwrap();
        parse_tasks(ANDROID_12).unwrap();
        assert!(std::ptr::eq(first, patterns().unwrap()));
    }
}
