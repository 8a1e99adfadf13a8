//! Error types surfaced by the runtime and by deferred handles.

use crate::task::TaskId;

use std::io;

use thiserror::Error;

/// Error produced when awaiting a [`Deferred`](crate::task::Deferred).
///
/// A task failure is captured when the background work panics and is then
/// stored on the handle. It is re-raised by every later await of the same
/// handle, never at launch time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The background work panicked before producing a value.
    #[error("task {id} failed: {message}")]
    Failure { id: TaskId, message: String },

    /// A suspension was attempted from a context that cannot suspend.
    ///
    /// Join futures must be polled by a runtime worker, and a runtime may not
    /// be blocked on from one of its own workers.
    #[error("cannot suspend here: not running inside a runtime worker")]
    IllegalContext,

    /// The work was launched after its runtime shut down and never ran.
    #[error("runtime is shut down")]
    Shutdown,
}

impl TaskError {
    /// Returns `true` if the background work itself failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskError::Failure { .. })
    }
}

/// Error returned when a runtime cannot be built.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The OS refused to start a worker or reactor thread.
    #[error("failed to spawn runtime thread: {0}")]
    Spawn(#[from] io::Error),
}
