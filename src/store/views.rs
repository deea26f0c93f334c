//! Pending/completed partitions of the task list.
//!
//! These are pure functions over the store's snapshot, recomputed at every
//! render. They hold no state of their own; `completed` on the task is the
//! only thing that decides which side a task lands on.

use crate::model::Task;

/// Tasks not yet completed, in store order.
pub fn pending_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| !t.completed).collect()
}

/// Completed tasks, in store order.
pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.completed).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskDraft, TaskId};

    fn task(id: &str, completed: bool) -> Task {
        let mut t = Task::new(
            TaskId::from(id),
            TaskDraft {
                title: format!("task {}", id),
                ..Default::default()
            },
        );
        t.completed = completed;
        t
    }

    #[test]
    fn partitions_cover_the_list_and_do_not_overlap() {
        let tasks = vec![
            task("a", false),
            task("b", true),
            task("c", false),
            task("d", true),
            task("e", false),
        ];
        let pending = pending_tasks(&tasks);
        let completed = completed_tasks(&tasks);

        assert_eq!(pending.len() + completed.len(), tasks.len());
        for t in &tasks {
            let in_pending = pending.iter().any(|p| p.id == t.id);
            let in_completed = completed.iter().any(|c| c.id == t.id);
            assert!(in_pending != in_completed, "task {} in exactly one side", t.id);
            assert_eq!(in_completed, t.completed);
        }
    }

    #[test]
    fn partition_preserves_store_order() {
        let tasks = vec![task("a", false), task("b", true), task("c", false)];
        let pending: Vec<&str> = pending_tasks(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(pending, vec!["a", "c"]);
    }

    #[test]
    fn empty_list_partitions_empty() {
        let tasks: Vec<Task> = Vec::new();
        assert!(pending_tasks(&tasks).is_empty());
        assert!(completed_tasks(&tasks).is_empty());
    }
}
