//! Terminal rendering for CLI results.
//!
//! Table cells for tasks and capabilities, notification lines for `watch`,
//! and colored JSON for every `--json` output.

use std::fmt::Write as _;

use colored::Colorize;
use serde_json::Value;

use crate::platform::{ComponentName, Provider};
use crate::tracker::TrackerNotification;

const INDENT: &str = "  ";

// ============================================================================
// JSON
// ============================================================================

/// Prints a JSON value pretty-printed and colored.
pub fn print_json(value: &Value) {
    println!("{}", highlight_json(value));
}

/// Pretty-prints a JSON value with keys, strings, numbers and literals
/// colored. With colors disabled the result equals
/// `serde_json::to_string_pretty`.
#[must_use]
pub fn highlight_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn quoted(text: &str) -> String { Value::String(text.to_owned()).to_string() }

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::Null => out.push_str(&"null".magenta().to_string()),
        Value::Bool(flag) => out.push_str(&flag.to_string().magenta().to_string()),
        Value::Number(number) => out.push_str(&number.to_string().yellow().to_string()),
        Value::String(text) => out.push_str(&quoted(text).green().to_string()),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Object(fields) if fields.is_empty() => out.push_str("{}"),
        Value::Array(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                open_entry(out, index, depth + 1);
                write_value(out, item, depth + 1);
            }
            close_block(out, depth, ']');
        }
        Value::Object(fields) => {
            out.push('{');
            for (index, (key, field)) in fields.iter().enumerate() {
                open_entry(out, index, depth + 1);
                let _ = write!(out, "{}: ", quoted(key).cyan());
                write_value(out, field, depth + 1);
            }
            close_block(out, depth, '}');
        }
    }
}

fn open_entry(out: &mut String, index: usize, depth: usize) {
    if index > 0 {
        out.push(',');
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
}

fn close_block(out: &mut String, depth: usize, close: char) {
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push(close);
}

// ============================================================================
// Table cells
// ============================================================================

/// Shortens `text` to `max` characters, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// A task's component in short form, or `-` when the platform gave none.
#[must_use]
pub fn component_cell(component: Option<&ComponentName>, max: usize) -> String {
    component.map_or_else(|| "-".to_owned(), |component| truncate(&component.to_string(), max))
}

/// Check mark for visible tasks, cross otherwise.
#[must_use]
pub fn visible_cell(visible: bool) -> String {
    if visible { "✓".green().to_string() } else { "✗".red().to_string() }
}

/// Provider name colored by how much it can do.
#[must_use]
pub fn provider_cell(provider: Provider) -> String {
    let label = provider.to_string();
    match provider {
        Provider::Privileged => label.green().to_string(),
        Provider::Shell => label.yellow().to_string(),
        Provider::Unavailable => label.red().to_string(),
    }
}

/// Whether root was confirmed; `None` when detection skipped the check.
#[must_use]
pub fn root_cell(root: Option<bool>) -> String {
    match root {
        Some(true) => "available".green().to_string(),
        Some(false) => "unavailable".red().to_string(),
        None => "not probed".dimmed().to_string(),
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// One `watch` line per tracker notification.
#[must_use]
pub fn notification_line(notification: &TrackerNotification) -> String {
    match notification {
        TrackerNotification::AppChanged { display_id, package } => {
            format!("{} display {display_id}: {}", "▶".green(), package.bold())
        }
        TrackerNotification::AppClosed { display_id } => {
            format!("{} display {display_id}: {}", "■".red(), "closed".dimmed())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn plain() { colored::control::set_override(false); }

    #[test]
    fn test_highlight_matches_pretty_layout_without_colors() {
        plain();
        let value = json!({
            "display": "shell",
            "root": null,
            "tasks": [{ "taskId": 12, "visible": true, "childTaskIds": [] }],
            "extra": {},
            "label": "say \"hi\"",
        });
        assert_eq!(highlight_json(&value), serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn test_highlight_scalars() {
        plain();
        assert_eq!(highlight_json(&json!(4)), "4");
        assert_eq!(highlight_json(&json!("appClosed")), "\"appClosed\"");
        assert_eq!(highlight_json(&json!([])), "[]");
    }

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("com.app.a", 20), "com.app.a");
        assert_eq!(truncate("com.app.a", 9), "com.app.a");
        assert_eq!(truncate("com.app.navigation", 8), "com.app…");
        assert_eq!(truncate("navi·gation", 6), "navi·…");
        assert_eq!(truncate("com.app", 1), "…");
    }

    #[test]
    fn test_component_cell() {
        let component = ComponentName::new("com.car.nav", "com.car.nav.MapActivity");
        assert_eq!(component_cell(Some(&component), 60), "com.car.nav/.MapActivity");
        assert_eq!(component_cell(Some(&component), 12), "com.car.nav…");
        assert_eq!(component_cell(None, 60), "-");
    }

    #[test]
    fn test_status_cells() {
        plain();
        assert_eq!(visible_cell(true), "✓");
        assert_eq!(visible_cell(false), "✗");
        assert_eq!(provider_cell(Provider::Shell), "shell");
        assert_eq!(root_cell(None), "not probed");
        assert_eq!(root_cell(Some(false)), "unavailable");
    }

    #[test]
    fn test_notification_line_names_display_and_package() {
        plain();
        let changed = TrackerNotification::AppChanged { display_id: 12, package: "com.app.a".to_string() };
        assert_eq!(notification_line(&changed), "▶ display 12: com.app.a");
        let closed = TrackerNotification::AppClosed { display_id: 13 };
        assert_eq!(notification_line(&closed), "■ display 13: closed");
    }
}
