use super::id::TaskId;
use super::state::{COMPLETED, FAILED, IDLE, NOTIFIED, QUEUED, RUNNING};
use super::waker::make_waker;
use super::{Deferred, TaskState};
use crate::error::TaskError;
use crate::runtime::context;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::utils::lock;

use std::any::Any;
use std::cell::UnsafeCell;
use std::future::Future;
use std::mem;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll, Waker};

/// Type-erased view of a task, as stored in run queues.
pub(crate) trait Runnable: Send + Sync {
    /// Polls the task once. Called by a worker thread.
    fn run(self: Arc<Self>);

    /// Drops the future of an unfinished task and forgets its join wakers.
    ///
    /// Returns `false` if the task had already finished or is being polled.
    fn release(&self) -> bool;
}

/// What a task ended with.
pub(crate) enum Outcome<T> {
    Pending,
    Completed(T),
    Failed(TaskError),
}

/// A launched unit of work and its eventual result.
///
/// The future is polled only by the worker that moved the task into
/// `RUNNING`. The outcome is written exactly once, by that same worker,
/// when the future finishes or panics.
pub(crate) struct Task<T> {
    id: TaskId,

    /// `None` once the future has finished or was never runnable.
    future: UnsafeCell<Option<Pin<Box<dyn Future<Output = T> + Send>>>>,

    outcome: Mutex<Outcome<T>>,

    /// Signalled when the outcome leaves `Pending`, for blocking waiters.
    finished: Condvar,

    pub(crate) state: AtomicUsize,

    injector: InjectorHandle,

    /// Wakers of join futures suspended on this task.
    waiters: Mutex<Vec<Waker>>,
}

// SAFETY: the future cell is only touched by the worker holding the task in
// `RUNNING`; every other field is synchronized.
unsafe impl<T: Send> Send for Task<T> {}
unsafe impl<T: Send> Sync for Task<T> {}

impl<T: Send + 'static> Task<T> {
    /// Creates a task in the `QUEUED` state, ready to be pushed to a queue.
    pub(crate) fn new<F>(future: F, injector: InjectorHandle) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            id: TaskId::next(),
            future: UnsafeCell::new(Some(Box::pin(future))),
            outcome: Mutex::new(Outcome::Pending),
            finished: Condvar::new(),
            state: AtomicUsize::new(QUEUED),
            injector,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Creates a task that is already `FAILED` and will never run.
    pub(crate) fn failed(error: TaskError, injector: InjectorHandle) -> Self {
        Self {
            id: TaskId::next(),
            future: UnsafeCell::new(None),
            outcome: Mutex::new(Outcome::Failed(error)),
            finished: Condvar::new(),
            state: AtomicUsize::new(FAILED),
            injector,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Polls the future once.
    ///
    /// A panic raised by the future is caught here and stored as the task's
    /// failure, so it never unwinds through the worker.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        // SAFETY: the successful transition to RUNNING gives this thread
        // exclusive access to the future cell.
        let slot = unsafe { &mut *self.future.get() };

        let Some(future) = slot.as_mut() else {
            return;
        };

        let waker = make_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        let polled = panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

        match polled {
            Ok(Poll::Pending) => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken during the poll.
                    self.state.store(QUEUED, Ordering::Release);
                    self.requeue();
                }
            }
            Ok(Poll::Ready(value)) => {
                *slot = None;
                self.finish(Outcome::Completed(value), COMPLETED);
            }
            Err(payload) => {
                *slot = None;

                let error = TaskError::Failure {
                    id: self.id,
                    message: panic_message(payload.as_ref()),
                };
                self.finish(Outcome::Failed(error), FAILED);
            }
        }
    }

    /// Requeues the task in response to a wake-up.
    ///
    /// An `IDLE` task is pushed back to the injector. A `RUNNING` task is
    /// marked `NOTIFIED` so the worker re-queues it after the current poll.
    /// Wakes in any other state are absorbed.
    pub(crate) fn schedule(self: Arc<Self>) {
        loop {
            match self.state.load(Ordering::Acquire) {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.requeue();
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    /// Pushes the task back to the injector. After shutdown the push is
    /// refused and the task stays `QUEUED` until it is released.
    fn requeue(self: &Arc<Self>) {
        if self.injector.push(self.clone()).is_err() {
            log::trace!("task {} woken after runtime shutdown", self.id);
        }
    }

    fn finish(&self, outcome: Outcome<T>, terminal: usize) {
        {
            let mut slot = lock(&self.outcome);
            *slot = outcome;
            self.state.store(terminal, Ordering::Release);
        }

        self.finished.notify_all();

        let waiters = mem::take(&mut *lock(&self.waiters));
        for waker in waiters {
            waker.wake();
        }
    }
}

impl<T> Task<T> {
    pub(crate) fn id(&self) -> TaskId {
        self.id
    }

    pub(crate) fn task_state(&self) -> TaskState {
        TaskState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Registers a join waker, skipping it if an equivalent one is stored.
    pub(crate) fn register(&self, waker: &Waker) {
        let mut waiters = lock(&self.waiters);

        if !waiters.iter().any(|w| w.will_wake(waker)) {
            waiters.push(waker.clone());
        }
    }
}

impl<T: Clone> Task<T> {
    /// Returns a copy of the outcome, or `None` while still pending.
    pub(crate) fn result(&self) -> Option<Result<T, TaskError>> {
        if !self.task_state().is_terminal() {
            return None;
        }

        match &*lock(&self.outcome) {
            Outcome::Pending => None,
            Outcome::Completed(value) => Some(Ok(value.clone())),
            Outcome::Failed(error) => Some(Err(error.clone())),
        }
    }

    /// Blocks the calling thread until the outcome is known.
    pub(crate) fn wait(&self) -> Result<T, TaskError> {
        let mut outcome = lock(&self.outcome);

        loop {
            match &*outcome {
                Outcome::Pending => {
                    outcome = self
                        .finished
                        .wait(outcome)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
                Outcome::Completed(value) => return Ok(value.clone()),
                Outcome::Failed(error) => return Err(error.clone()),
            }
        }
    }
}

impl<T: Send + 'static> Runnable for Task<T> {
    fn run(self: Arc<Self>) {
        Task::run(self)
    }

    fn release(&self) -> bool {
        loop {
            let current = self.state.load(Ordering::Acquire);

            if !matches!(current, IDLE | QUEUED | NOTIFIED) {
                return false;
            }

            // Claiming RUNNING keeps every later run and wake away from the
            // future cell. The handle keeps reporting `Pending`.
            if self
                .state
                .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }

        // SAFETY: the transition to RUNNING gives this thread exclusive
        // access to the future cell.
        let future = unsafe { (*self.future.get()).take() };
        drop(future);

        let waiters = mem::take(&mut *lock(&self.waiters));
        drop(waiters);

        true
    }
}

/// Launches a future onto the runtime the caller is running on.
///
/// The work starts running concurrently right away and this function
/// returns without waiting for it. The task is detached from the caller:
/// if the caller fails or returns early, the work still runs to completion.
/// Dropping the returned [`Deferred`] only gives up the ability to observe
/// the result.
///
/// When called from a worker, the task is pushed to that worker's local
/// queue; otherwise it goes through the runtime's injector.
///
/// # Panics
///
/// Panics if called outside the context of a runtime. Use
/// [`Launcher::launch`](crate::Launcher::launch) from plain threads.
///
/// # Examples
///
/// ```rust,ignore
/// let answer = task::launch(async { 42 });
/// assert_eq!(answer.await, Ok(42));
/// ```
pub fn launch<F, T>(future: F) -> Deferred<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    context::current_launcher()
        .expect("launch must be called within the context of a runtime")
        .launch(future)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("task panicked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::work_stealing::injector::Injector;

    use std::future;
    use std::sync::atomic::AtomicUsize;

    fn injector() -> InjectorHandle {
        Arc::new(Injector::new())
    }

    #[test]
    fn ready_future_completes_on_first_run() {
        let task = Arc::new(Task::new(async { 7 }, injector()));

        assert_eq!(task.task_state(), TaskState::Pending);
        task.clone().run();

        assert_eq!(task.task_state(), TaskState::Completed);
        assert_eq!(task.result(), Some(Ok(7)));
        assert_eq!(task.wait(), Ok(7));
    }

    #[test]
    fn panic_is_stored_as_failure() {
        let task = Arc::new(Task::new(
            async {
                if true {
                    panic!("boom");
                }
                0u8
            },
            injector(),
        ));
        task.clone().run();

        assert_eq!(task.task_state(), TaskState::Failed);
        match task.result() {
            Some(Err(TaskError::Failure { id, message })) => {
                assert_eq!(id, task.id());
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn pending_future_goes_idle_and_wake_requeues() {
        let injector = injector();
        let task = Arc::new(Task::new(future::pending::<()>(), injector.clone()));

        task.clone().run();
        assert_eq!(task.state.load(Ordering::Acquire), IDLE);
        assert!(injector.steal().is_none());

        task.clone().schedule();
        assert_eq!(task.state.load(Ordering::Acquire), QUEUED);
        assert!(injector.steal().is_some());

        // A second wake while already queued must not enqueue twice.
        task.clone().schedule();
        assert!(injector.steal().is_none());
    }

    #[test]
    fn terminal_state_ignores_runs_and_wakes() {
        let injector = injector();
        let task = Arc::new(Task::new(async { "done" }, injector.clone()));

        task.clone().run();
        task.clone().schedule();
        task.clone().run();

        assert_eq!(task.task_state(), TaskState::Completed);
        assert!(injector.steal().is_none());
        assert_eq!(task.result(), Some(Ok("done")));
    }

    #[test]
    fn release_drops_suspended_future_and_waiters() {
        struct Guard(Arc<AtomicUsize>);

        impl Drop for Guard {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let dropped = Arc::new(AtomicUsize::new(0));
        let guard = Guard(dropped.clone());

        let task = Arc::new(Task::new(
            async move {
                let _guard = guard;
                future::pending::<()>().await
            },
            injector(),
        ));
        task.clone().run();
        task.register(&make_waker(task.clone()));

        assert!(Runnable::release(&*task));
        assert_eq!(dropped.load(Ordering::SeqCst), 1);
        assert_eq!(task.task_state(), TaskState::Pending);
        assert!(lock(&task.waiters).is_empty());

        // Later runs, wakes and releases are absorbed.
        task.clone().schedule();
        task.clone().run();
        assert!(!Runnable::release(&*task));
    }

    #[test]
    fn finished_task_is_not_released() {
        let task = Arc::new(Task::new(async { 1 }, injector()));
        task.clone().run();

        assert!(!Runnable::release(&*task));
        assert_eq!(task.result(), Some(Ok(1)));
    }

    #[test]
    fn failed_task_is_born_terminal() {
        let task = Task::<u32>::failed(TaskError::Shutdown, injector());

        assert_eq!(task.task_state(), TaskState::Failed);
        assert_eq!(task.result(), Some(Err(TaskError::Shutdown)));
    }
}
