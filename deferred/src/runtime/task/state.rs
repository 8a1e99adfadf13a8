//! Scheduling states of a task.
//!
//! A task moves `QUEUED → RUNNING → {IDLE, NOTIFIED, COMPLETED, FAILED}`.
//! `COMPLETED` and `FAILED` are terminal: once stored, no wake or poll
//! changes them again.

/// Task is waiting on an external event and is in no queue.
pub(crate) const IDLE: usize = 0;

/// Task sits in a run queue.
pub(crate) const QUEUED: usize = 1;

/// A worker is polling the task. At most one worker observes this state.
pub(crate) const RUNNING: usize = 2;

/// The future returned `Poll::Ready`; the result is stored.
pub(crate) const COMPLETED: usize = 3;

/// The task was woken while running and must be re-queued after the poll.
pub(crate) const NOTIFIED: usize = 4;

/// The future panicked; the failure is stored.
pub(crate) const FAILED: usize = 5;

/// Completion state of a task as seen through its [`Deferred`](super::Deferred).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// The work has not finished yet. It may be queued, running or suspended.
    Pending,
    /// The work produced a value.
    Completed,
    /// The work failed. Awaiting the handle yields the stored error.
    Failed,
}

impl TaskState {
    pub(crate) fn from_raw(raw: usize) -> Self {
        match raw {
            COMPLETED => TaskState::Completed,
            FAILED => TaskState::Failed,
            _ => TaskState::Pending,
        }
    }

    /// Returns `true` once the task can no longer change state.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}
