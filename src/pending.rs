//! Optimistic completion: a tapped checkbox renders as done immediately,
//! but the store commit is held back for a short window so a second tap
//! can take it back.
//!
//! No OS timers; the event loop ticks and drains due entries with
//! [`PendingCommits::take_due`]. At most one entry exists per task id.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::TaskId;

/// What a checkbox tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Second tap inside the window: the pending commit was cancelled and
    /// the row goes back to rendering incomplete. No store call happens.
    Cancelled,
    /// The store already has the task completed (changed from elsewhere
    /// while the row was on screen); caller should toggle it back to
    /// incomplete right away, no window.
    RevertNow,
    /// Normal path: the commit is scheduled and the row renders completed
    /// from now on.
    Scheduled,
}

/// Deadline map from task id to the instant its completion commits.
#[derive(Debug)]
pub struct PendingCommits {
    deadlines: HashMap<TaskId, Instant>,
    delay: Duration,
}

impl PendingCommits {
    pub fn new(delay: Duration) -> Self {
        PendingCommits {
            deadlines: HashMap::new(),
            delay,
        }
    }

    /// Handle a checkbox tap on the task with id `id`, where
    /// `already_completed` is the store's current flag for it.
    pub fn tap(&mut self, id: &TaskId, already_completed: bool, now: Instant) -> TapOutcome {
        if self.deadlines.remove(id).is_some() {
            return TapOutcome::Cancelled;
        }
        if already_completed {
            return TapOutcome::RevertNow;
        }
        self.deadlines.insert(id.clone(), now + self.delay);
        TapOutcome::Scheduled
    }

    /// True while the task renders as completed ahead of the store.
    pub fn is_pending(&self, id: &TaskId) -> bool {
        self.deadlines.contains_key(id)
    }

    /// Clear the entry for `id`, if any. Deletion handling calls this so a
    /// deleted task's timer can never fire.
    pub fn cancel(&mut self, id: &TaskId) -> bool {
        self.deadlines.remove(id).is_some()
    }

    /// Drop entries whose task no longer exists (e.g. deleted out of a
    /// remote snapshot).
    pub fn prune_missing<'a>(&mut self, live: impl Iterator<Item = &'a TaskId>) {
        let live: std::collections::HashSet<&TaskId> = live.collect();
        self.deadlines.retain(|id, _| live.contains(id));
    }

    /// Remove and return every id whose deadline has passed. The caller
    /// commits each with `toggle(id, Some(true))`.
    pub fn take_due(&mut self, now: Instant) -> Vec<TaskId> {
        let due: Vec<TaskId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &due {
            self.deadlines.remove(id);
        }
        due
    }

    /// Earliest outstanding deadline, for sizing the event-loop poll
    /// timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}
