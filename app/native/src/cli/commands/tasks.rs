//! Task listing command.

use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::cli::context::CliContext;
use crate::cli::output::{component_cell, print_json, visible_cell};
use crate::error::CarrotError;
use crate::platform::{DisplayId, TaskRecord};

/// Maximum width of the component column.
const COMPONENT_WIDTH: usize = 60;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i32,
    #[tabled(rename = "Display")]
    display: i32,
    #[tabled(rename = "Component")]
    component: String,
    #[tabled(rename = "Activities")]
    activities: u32,
    #[tabled(rename = "Visible")]
    visible: String,
}

impl From<&TaskRecord> for TaskRow {
    fn from(task: &TaskRecord) -> Self {
        Self {
            id: task.task_id,
            display: task.display_id,
            component: component_cell(task.component(), COMPONENT_WIDTH),
            activities: task.num_activities,
            visible: visible_cell(task.visible),
        }
    }
}

fn filter_tasks(tasks: Vec<TaskRecord>, display: Option<DisplayId>) -> Vec<TaskRecord> {
    match display {
        Some(id) => tasks.into_iter().filter(|task| task.display_id == id).collect(),
        None => tasks,
    }
}

fn render_table(tasks: &[TaskRecord]) -> String {
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::right()))
        .to_string()
}

/// Lists tasks across displays.
///
/// # Errors
///
/// Returns an error if no elevated shell is available or the task list
/// could not be read.
pub fn execute(display: Option<DisplayId>, json: bool) -> Result<(), CarrotError> {
    let ctx = CliContext::new();
    let tasks = filter_tasks(ctx.task_backend()?.list_tasks()?, display);

    if json {
        print_json(&serde_json::to_value(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("{}", "No tasks found.".dimmed());
        return Ok(());
    }

    println!("{}", format!("Tasks ({})", tasks.len()).bold());
    println!("{}", render_table(&tasks));
    Ok(())
}
