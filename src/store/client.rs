//! Blocking HTTP client for the remote document collection.
//!
//! Task documents live under a per-device partition:
//! `{base_url}/users/{device}/tasks`. The server assigns document ids and
//! `createdAt` timestamps; the list endpoint returns newest first.

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{RemoteConfig, Task, TaskDraft, TaskId};

use super::StoreError;

/// Wire form of a task document. Field names follow the collection's
/// camelCase convention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDoc {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A document paired with its server-assigned id, as the list endpoint
/// returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRow {
    pub id: String,
    #[serde(flatten)]
    pub doc: TaskDoc,
}

/// Response to an insert.
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletedPatch {
    completed: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: TaskId(row.id),
            title: row.doc.title,
            description: row.doc.description,
            due_date: row.doc.due_date,
            completed: row.doc.completed,
            created_at: row.doc.created_at,
        }
    }
}

impl From<&TaskDraft> for TaskDoc {
    fn from(draft: &TaskDraft) -> Self {
        TaskDoc {
            title: draft.title.clone(),
            description: draft.description.clone(),
            due_date: draft.due_date,
            completed: false,
            created_at: None,
        }
    }
}

/// Client for one device's task partition.
pub struct RemoteClient {
    http: Client,
    base_url: String,
    device: String,
}

impl RemoteClient {
    pub fn new(config: &RemoteConfig, device: String) -> Result<Self, StoreError> {
        if config.base_url.is_empty() {
            return Err(StoreError::NotConfigured);
        }
        let http = Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(RemoteClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            device,
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/users/{}/tasks", self.base_url, self.device)
    }

    fn doc_url(&self, id: &TaskId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Fetch the partition's tasks, newest first.
    pub fn list(&self) -> Result<Vec<Task>, StoreError> {
        let response = self.http.get(self.collection_url()).send()?;
        let response = check(response, "list")?;
        let rows: Vec<TaskRow> = response.json()?;
        let mut tasks: Vec<Task> = rows.into_iter().map(Task::from).collect();
        // The server orders by createdAt descending; re-sorting keeps the
        // invariant even against a lax server.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = tasks.len(), "fetched remote snapshot");
        Ok(tasks)
    }

    /// Insert a new document and return its server-assigned id.
    pub fn add(&self, draft: &TaskDraft) -> Result<TaskId, StoreError> {
        let response = self
            .http
            .post(self.collection_url())
            .json(&TaskDoc::from(draft))
            .send()?;
        let response = check(response, "add")?;
        let created: CreatedResponse = response.json()?;
        Ok(TaskId(created.id))
    }

    /// Set the document's completed flag. A missing document is a no-op.
    pub fn set_completed(&self, id: &TaskId, completed: bool) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.doc_url(id))
            .json(&CompletedPatch { completed })
            .send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response, "toggle")?;
        Ok(())
    }

    /// Delete the document. A missing document is a no-op.
    pub fn delete(&self, id: &TaskId) -> Result<(), StoreError> {
        let response = self.http.delete(self.doc_url(id)).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check(response, "delete")?;
        Ok(())
    }
}

fn check(
    response: reqwest::blocking::Response,
    op: &'static str,
) -> Result<reqwest::blocking::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StoreError::Rejected { op, status })
    }
}
