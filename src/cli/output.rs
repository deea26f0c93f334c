use chrono::NaiveDate;
use serde::Serialize;

use crate::model::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
}

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        title: task.title.clone(),
        description: task.description.clone(),
        due_date: task.due_date,
        completed: task.completed,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary
pub fn format_task_line(task: &Task) -> String {
    let checkbox = if task.completed { 'x' } else { ' ' };
    let due_str = task
        .due_date
        .map(|d| format!("  (due {})", d))
        .unwrap_or_default();
    format!("[{}] {}  {}{}", checkbox, task.id, task.title, due_str)
}

/// Format a task with its description indented below, if it has one
pub fn format_task_block(task: &Task) -> Vec<String> {
    let mut lines = vec![format_task_line(task)];
    if let Some(desc) = &task.description {
        for line in desc.lines() {
            lines.push(format!("      {}", line));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskDraft, TaskId};
    use pretty_assertions::assert_eq;

    fn task() -> Task {
        let mut t = Task::new(
            TaskId::from("abc123"),
            TaskDraft {
                title: "Buy milk".into(),
                description: Some("2% if they have it".into()),
                due_date: NaiveDate::from_ymd_opt(2026, 3, 10),
            },
        );
        t.completed = false;
        t
    }

    #[test]
    fn line_shows_checkbox_id_title_due() {
        assert_eq!(
            format_task_line(&task()),
            "[ ] abc123  Buy milk  (due 2026-03-10)"
        );
        let mut done = task();
        done.completed = true;
        assert!(format_task_line(&done).starts_with("[x]"));
    }

    #[test]
    fn block_indents_description() {
        let lines = format_task_block(&task());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "      2% if they have it");
    }

    #[test]
    fn json_omits_unset_optionals() {
        let mut t = task();
        t.description = None;
        t.due_date = None;
        let value = serde_json::to_value(task_to_json(&t)).unwrap();
        assert!(value.get("description").is_none());
        assert!(value.get("due_date").is_none());
        assert_eq!(value["completed"], false);
    }
}
