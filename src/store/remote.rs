use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::model::{RemoteConfig, Task, TaskDraft, TaskId};

use super::client::RemoteClient;
use super::{AddOutcome, StoreError, StoreEvent, StoreOp, TaskStore};

/// Commands sent from the UI thread to the sync worker.
#[derive(Debug)]
enum Command {
    Add(TaskDraft),
    SetCompleted(TaskId, bool),
    Delete(TaskId),
}

/// Events sent from the sync worker back to the UI thread.
#[derive(Debug)]
enum WorkerEvent {
    Snapshot(Vec<Task>),
    Added(TaskId),
    Failed { op: StoreOp, message: String },
}

/// Remote backing: the task list lives in a per-device partition of the
/// document collection. Mutations are enqueued to a worker thread that
/// performs the network calls; fresh snapshots and failures come back
/// through `poll()`, so the UI thread never blocks on the network.
pub struct RemoteStore {
    tasks: Vec<Task>,
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<WorkerEvent>,
}

impl RemoteStore {
    /// Connect to the partition for `device` and start the sync worker.
    /// The first snapshot arrives asynchronously via `poll()`.
    pub fn start(config: &RemoteConfig, device: String) -> Result<Self, StoreError> {
        let client = RemoteClient::new(config, device)?;
        let refresh = Duration::from_millis(config.refresh_ms.max(250));

        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("taskmate-sync".into())
            .spawn(move || worker_loop(client, cmd_rx, event_tx, refresh))
            .map_err(|_| StoreError::WorkerGone)?;

        Ok(RemoteStore {
            tasks: Vec::new(),
            cmd_tx,
            event_rx,
        })
    }

    #[cfg(test)]
    fn with_channels(
        tasks: Vec<Task>,
        cmd_tx: mpsc::Sender<Command>,
        event_rx: mpsc::Receiver<WorkerEvent>,
    ) -> Self {
        RemoteStore {
            tasks,
            cmd_tx,
            event_rx,
        }
    }

    fn send(&self, cmd: Command) -> Result<(), StoreError> {
        self.cmd_tx.send(cmd).map_err(|_| StoreError::WorkerGone)
    }
}

impl TaskStore for RemoteStore {
    fn add(&mut self, draft: TaskDraft) -> Result<AddOutcome, StoreError> {
        self.send(Command::Add(draft))?;
        Ok(AddOutcome::Submitted)
    }

    fn toggle(&mut self, id: &TaskId, value: Option<bool>) -> Result<(), StoreError> {
        // Resolve a flip against the current snapshot; an id the snapshot no
        // longer has is a deletion race, not an error.
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return Ok(());
        };
        let target = value.unwrap_or(!task.completed);
        // Applied provisionally so the row doesn't lag the round-trip; the
        // next authoritative snapshot confirms or reverts it.
        task.completed = target;
        self.send(Command::SetCompleted(id.clone(), target))
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.tasks.retain(|t| &t.id != id);
        self.send(Command::Delete(id.clone()))
    }

    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn poll(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                WorkerEvent::Snapshot(tasks) => {
                    self.tasks = tasks;
                    events.push(StoreEvent::Changed);
                }
                WorkerEvent::Added(id) => events.push(StoreEvent::Added(id)),
                WorkerEvent::Failed { op, message } => {
                    events.push(StoreEvent::OpFailed { op, message })
                }
            }
        }
        events
    }
}

/// Worker loop: serve queued commands, refetch after every mutation and on
/// the refresh interval, and forward snapshots that actually changed.
/// Exits when the UI side hangs up.
fn worker_loop(
    client: RemoteClient,
    cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<WorkerEvent>,
    refresh: Duration,
) {
    let mut last_sent: Option<Vec<Task>> = None;

    // Initial snapshot before the first interval elapses
    refetch(&client, &event_tx, &mut last_sent);

    loop {
        match cmd_rx.recv_timeout(refresh) {
            Ok(cmd) => {
                let changed = run_command(&client, &event_tx, cmd);
                if changed {
                    refetch(&client, &event_tx, &mut last_sent);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                refetch(&client, &event_tx, &mut last_sent);
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                debug!("sync worker shutting down");
                return;
            }
        }
    }
}

/// Run one mutation. Returns true when the collection may have changed.
fn run_command(
    client: &RemoteClient,
    event_tx: &mpsc::Sender<WorkerEvent>,
    cmd: Command,
) -> bool {
    let result = match &cmd {
        Command::Add(draft) => match client.add(draft) {
            Ok(id) => {
                let _ = event_tx.send(WorkerEvent::Added(id));
                Ok(())
            }
            Err(e) => Err((StoreOp::Add, e)),
        },
        Command::SetCompleted(id, completed) => client
            .set_completed(id, *completed)
            .map_err(|e| (StoreOp::Toggle, e)),
        Command::Delete(id) => client.delete(id).map_err(|e| (StoreOp::Delete, e)),
    };

    match result {
        Ok(()) => true,
        Err((op, e)) => {
            warn!(%op, error = %e, "remote operation failed");
            let _ = event_tx.send(WorkerEvent::Failed {
                op,
                message: e.to_string(),
            });
            false
        }
    }
}

fn refetch(
    client: &RemoteClient,
    event_tx: &mpsc::Sender<WorkerEvent>,
    last_sent: &mut Option<Vec<Task>>,
) {
    match client.list() {
        Ok(tasks) => {
            if last_sent.as_ref() != Some(&tasks) {
                *last_sent = Some(tasks.clone());
                let _ = event_tx.send(WorkerEvent::Snapshot(tasks));
            }
        }
        Err(e) => {
            // Keep the previous snapshot; the next interval retries
            warn!(error = %e, "snapshot refetch failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskDraft;

    fn task(id: &str, completed: bool) -> Task {
        let mut t = Task::new(
            TaskId::from(id),
            TaskDraft {
                title: id.to_string(),
                ..Default::default()
            },
        );
        t.completed = completed;
        t
    }

    fn store_with(
        tasks: Vec<Task>,
    ) -> (RemoteStore, mpsc::Receiver<Command>, mpsc::Sender<WorkerEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        (
            RemoteStore::with_channels(tasks, cmd_tx, event_rx),
            cmd_rx,
            event_tx,
        )
    }

    #[test]
    fn add_is_deferred() {
        let (mut store, cmd_rx, _event_tx) = store_with(Vec::new());
        let outcome = store
            .add(TaskDraft {
                title: "Buy milk".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(outcome, AddOutcome::Submitted);
        assert!(matches!(cmd_rx.try_recv().unwrap(), Command::Add(_)));
        // Nothing visible until the snapshot lands
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn flip_resolves_against_snapshot() {
        let (mut store, cmd_rx, _event_tx) = store_with(vec![task("a", false)]);
        store.toggle(&TaskId::from("a"), None).unwrap();
        match cmd_rx.try_recv().unwrap() {
            Command::SetCompleted(id, value) => {
                assert_eq!(id.as_str(), "a");
                assert!(value);
            }
            other => panic!("unexpected command {:?}", other),
        }
        // Applied provisionally ahead of the snapshot
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn delete_applies_provisionally_and_enqueues() {
        let (mut store, cmd_rx, _event_tx) = store_with(vec![task("a", false)]);
        store.delete(&TaskId::from("a")).unwrap();
        assert!(store.tasks().is_empty());
        assert!(matches!(cmd_rx.try_recv().unwrap(), Command::Delete(_)));
    }

    #[test]
    fn flip_of_unknown_id_sends_nothing() {
        let (mut store, cmd_rx, _event_tx) = store_with(Vec::new());
        store.toggle(&TaskId::from("ghost"), None).unwrap();
        assert!(cmd_rx.try_recv().is_err());
    }

    #[test]
    fn explicit_toggle_value_passes_through() {
        let (mut store, cmd_rx, _event_tx) = store_with(vec![task("a", true)]);
        store.toggle(&TaskId::from("a"), Some(true)).unwrap();
        assert!(matches!(
            cmd_rx.try_recv().unwrap(),
            Command::SetCompleted(_, true)
        ));
    }

    #[test]
    fn poll_applies_snapshots_and_maps_events() {
        let (mut store, _cmd_rx, event_tx) = store_with(Vec::new());
        event_tx
            .send(WorkerEvent::Snapshot(vec![task("a", false)]))
            .unwrap();
        event_tx.send(WorkerEvent::Added(TaskId::from("a"))).unwrap();
        event_tx
            .send(WorkerEvent::Failed {
                op: StoreOp::Toggle,
                message: "boom".into(),
            })
            .unwrap();

        let events = store.poll();
        assert_eq!(store.tasks().len(), 1);
        assert!(matches!(events[0], StoreEvent::Changed));
        assert!(matches!(events[1], StoreEvent::Added(_)));
        assert!(matches!(
            events[2],
            StoreEvent::OpFailed {
                op: StoreOp::Toggle,
                ..
            }
        ));
    }

    #[test]
    fn worker_gone_surfaces_as_error() {
        let (mut store, cmd_rx, _event_tx) = store_with(vec![task("a", false)]);
        drop(cmd_rx);
        assert!(matches!(
            store.delete(&TaskId::from("a")),
            Err(StoreError::WorkerGone)
        ));
    }
}
