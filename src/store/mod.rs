pub mod client;
pub mod local;
pub mod remote;
pub mod views;

pub use local::LocalStore;
pub use remote::RemoteStore;

use crate::identity;
use crate::model::{AppConfig, Backing, Task, TaskDraft, TaskId};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("remote store is not configured (set [store.remote] base_url)")]
    NotConfigured,
    #[error("device identity: {0}")]
    Identity(#[from] identity::IdentityError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server rejected {op}: {status}")]
    Rejected {
        op: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("sync worker is gone")]
    WorkerGone,
}

/// Which mutating operation an asynchronous failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Add,
    Toggle,
    Delete,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StoreOp::Add => "add",
            StoreOp::Toggle => "toggle",
            StoreOp::Delete => "delete",
        })
    }
}

/// Notifications drained by the UI each tick. Both backings emit these so
/// the screens refresh through one path.
#[derive(Debug)]
pub enum StoreEvent {
    /// The task list changed (mutation applied or a fresh snapshot arrived)
    Changed,
    /// An add completed and the task now has its final id
    Added(TaskId),
    /// An asynchronous operation failed; the list was not updated
    OpFailed { op: StoreOp, message: String },
}

/// Result of an `add` call. The local backing assigns the id inline; the
/// remote backing acknowledges receipt and delivers the server-assigned id
/// later as `StoreEvent::Added`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(TaskId),
    Submitted,
}

/// Single source of truth for the task list.
///
/// `toggle` and `delete` on an unknown id are silent no-ops: a row can
/// outlive its task when a deletion lands first, and surfacing that race as
/// an error helps nobody.
pub trait TaskStore {
    /// Insert a validated draft with `completed = false`, newest first.
    fn add(&mut self, draft: TaskDraft) -> Result<AddOutcome, StoreError>;

    /// Flip `completed`, or set it to `value` when given.
    fn toggle(&mut self, id: &TaskId, value: Option<bool>) -> Result<(), StoreError>;

    /// Remove the task if present.
    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError>;

    /// Current snapshot, newest first.
    fn tasks(&self) -> &[Task];

    /// Drain pending notifications. Never blocks.
    fn poll(&mut self) -> Vec<StoreEvent>;
}

/// Build the store selected by the config. The remote backing resolves the
/// device identity once, up front, to pick its partition.
pub fn open_store(
    config: &AppConfig,
    data_dir: &std::path::Path,
) -> Result<Box<dyn TaskStore>, StoreError> {
    match config.store.backing {
        Backing::Local => Ok(Box::new(LocalStore::new())),
        Backing::Remote => {
            let device = identity::device_id(data_dir)?;
            let store = RemoteStore::start(&config.store.remote, device)?;
            Ok(Box::new(store))
        }
    }
}
