use chrono::Utc;
use tracing::debug;

use crate::model::{Task, TaskDraft, TaskId};

use super::{AddOutcome, StoreError, StoreEvent, TaskStore};

/// In-process task list. Mutations are synchronous and nothing survives a
/// restart. Mutations are mirrored as events so the UI refresh path is the
/// same for both backings.
#[derive(Debug, Default)]
pub struct LocalStore {
    tasks: Vec<Task>,
    events: Vec<StoreEvent>,
}

impl LocalStore {
    pub fn new() -> Self {
        LocalStore::default()
    }

    /// A store pre-seeded with tasks, newest first. Used by tests and the
    /// render harness.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        LocalStore {
            tasks,
            events: Vec::new(),
        }
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| &t.id == id)
    }
}

impl TaskStore for LocalStore {
    fn add(&mut self, draft: TaskDraft) -> Result<AddOutcome, StoreError> {
        let id = TaskId::new_random();
        let mut task = Task::new(id.clone(), draft);
        task.created_at = Some(Utc::now());
        debug!(id = %id, title = %task.title, "local add");
        self.tasks.insert(0, task);
        self.events.push(StoreEvent::Added(id.clone()));
        self.events.push(StoreEvent::Changed);
        Ok(AddOutcome::Added(id))
    }

    fn toggle(&mut self, id: &TaskId, value: Option<bool>) -> Result<(), StoreError> {
        let Some(idx) = self.position(id) else {
            // Row may have been deleted out from under the caller
            return Ok(());
        };
        let task = &mut self.tasks[idx];
        task.completed = value.unwrap_or(!task.completed);
        self.events.push(StoreEvent::Changed);
        Ok(())
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        if let Some(idx) = self.position(id) {
            self.tasks.remove(idx);
            self.events.push(StoreEvent::Changed);
        }
        Ok(())
    }

    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn poll(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }
}
