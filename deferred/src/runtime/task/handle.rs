use super::core::Task;
use super::id::TaskId;
use super::state::TaskState;
use crate::error::TaskError;
use crate::runtime::context;

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Handle to the eventual result of a launched task.
///
/// A `Deferred` is returned by every launch. The work is already running
/// when the handle is handed out; the handle only observes it.
///
/// - Awaiting the handle suspends the current task until the work finishes,
///   then yields `Ok(value)` or the stored [`TaskError`].
/// - Awaiting again returns a clone of the same outcome; the work is never
///   executed twice.
/// - Cloning the handle gives another observer of the same task.
/// - Dropping every handle does **not** cancel the work. A failure nobody
///   awaits is absorbed by the runtime without a log record. The panic hook
///   still runs, so the default hook prints the panic to stderr.
///
/// # Examples
///
/// ```rust,ignore
/// let one = launcher.launch(async { 13 });
/// let two = launcher.launch(async { 29 });
///
/// let answer = runtime.block_on(async move {
///     Ok::<_, TaskError>(one.await? + two.await?)
/// })?;
/// assert_eq!(answer, 42);
/// ```
pub struct Deferred<T> {
    task: Arc<Task<T>>,
}

impl<T> Deferred<T> {
    pub(crate) fn new(task: Arc<Task<T>>) -> Self {
        Self { task }
    }

    /// Identity of the underlying task.
    pub fn id(&self) -> TaskId {
        self.task.id()
    }

    /// Current completion state. Never blocks.
    pub fn state(&self) -> TaskState {
        self.task.task_state()
    }

    /// Returns `true` once the work has completed or failed.
    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }
}

impl<T: Clone> Deferred<T> {
    /// Returns a future resolving to the task's outcome.
    ///
    /// The join future must be polled from a runtime worker. Polled from
    /// anywhere else it resolves to [`TaskError::IllegalContext`] at once,
    /// without touching the task.
    pub fn join(&self) -> Join<T> {
        Join {
            task: self.task.clone(),
        }
    }

    /// Returns the outcome if the task has already finished, without
    /// suspending.
    pub fn try_result(&self) -> Option<Result<T, TaskError>> {
        self.task.result()
    }

    /// Blocks the calling thread until the task finishes.
    ///
    /// Used to bridge synchronous callers; never call it on a worker.
    pub(crate) fn wait(&self) -> Result<T, TaskError> {
        self.task.wait()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            task: self.task.clone(),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

impl<T: Clone> IntoFuture for Deferred<T> {
    type Output = Result<T, TaskError>;
    type IntoFuture = Join<T>;

    fn into_future(self) -> Join<T> {
        Join { task: self.task }
    }
}

impl<T: Clone> IntoFuture for &Deferred<T> {
    type Output = Result<T, TaskError>;
    type IntoFuture = Join<T>;

    fn into_future(self) -> Join<T> {
        self.join()
    }
}

/// Future returned by [`Deferred::join`].
pub struct Join<T> {
    task: Arc<Task<T>>,
}

impl<T: Clone> Future for Join<T> {
    type Output = Result<T, TaskError>;

    /// Resolves once the task leaves `Pending`.
    ///
    /// The waker is registered before the outcome is checked a second time,
    /// so a completion racing with this poll is never missed.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !context::on_worker() {
            return Poll::Ready(Err(TaskError::IllegalContext));
        }

        if let Some(outcome) = self.task.result() {
            return Poll::Ready(outcome);
        }

        self.task.register(cx.waker());

        match self.task.result() {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for Join<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Join").field("id", &self.task.id()).finish()
    }
}
