use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque task identifier. Locally generated (UUID v4) for the in-memory
/// backing, server-assigned for the remote backing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new_random() -> Self {
        TaskId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display title (non-empty)
    pub title: String,
    pub description: Option<String>,
    /// Plain calendar date, no time-of-day semantics
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    /// Creation instant; server-assigned for remote documents, stamped at
    /// insert time for the local backing. Used only for newest-first ordering.
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a task from validated draft fields. New tasks always start
    /// incomplete.
    pub fn new(id: TaskId, draft: TaskDraft) -> Self {
        Task {
            id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            completed: false,
            created_at: None,
        }
    }

    /// Whether the due date has passed relative to `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date.is_some_and(|d| d < today) && !self.completed
    }
}

/// Error type for draft validation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("due date {0} is in the past")]
    DueDateInPast(NaiveDate),
    #[error("invalid due date '{0}' (expected YYYY-MM-DD)")]
    BadDueDate(String),
}

/// User input for a new task, validated before it reaches a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Normalize and check the draft: the title must be non-empty after
    /// trimming, and the due date (if any) must not be before `today`.
    /// On success the title and description come back trimmed.
    pub fn validate(mut self, today: NaiveDate) -> Result<TaskDraft, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        self.title = title.to_string();

        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if let Some(due) = self.due_date {
            if due < today {
                return Err(DraftError::DueDateInPast(due));
            }
        }
        Ok(self)
    }
}

/// Parse a `YYYY-MM-DD` due date string.
pub fn parse_due_date(s: &str) -> Result<NaiveDate, DraftError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DraftError::BadDueDate(s.trim().to_string()))
}
