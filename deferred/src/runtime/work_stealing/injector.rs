use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::mem;
use std::sync::{Arc, Condvar, Mutex, Weak};
use std::time::Duration;

/// Shared handle to the global task injector.
pub(crate) type InjectorHandle = Arc<Injector>;

/// How long an idle worker sleeps before re-checking every queue.
///
/// Local pushes do not notify the condvar, so parking must be bounded.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Global run queue of a runtime.
///
/// Tasks launched from outside a worker, and tasks re-queued after being
/// woken, land here. Idle workers park on the injector's condvar.
///
/// The injector also tracks every launched task weakly, so that tasks
/// suspended at shutdown can be released even when they keep each other
/// alive through join wakers.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Arc<dyn Runnable>>>,
    condvar: Condvar,
    /// Written under the `queue` lock, so a push either lands before the
    /// final drain or is refused.
    shutdown: AtomicBool,
    tasks: Mutex<Vec<Weak<dyn Runnable>>>,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Stops accepting work and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        {
            let _queue = lock(&self.queue);
            self.shutdown.store(true, Ordering::Release);
        }

        self.condvar.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Enqueues a task and wakes one parked worker.
    ///
    /// Hands the task back once the injector has shut down.
    pub(crate) fn push(&self, task: Arc<dyn Runnable>) -> Result<(), Arc<dyn Runnable>> {
        {
            let mut queue = lock(&self.queue);

            if self.is_shutdown() {
                return Err(task);
            }

            queue.push_back(task);
        }

        self.condvar.notify_one();
        Ok(())
    }

    /// Records a launched task for [`release_all`](Self::release_all).
    ///
    /// Dead entries are pruned whenever the list reaches its capacity.
    pub(crate) fn track(&self, task: Weak<dyn Runnable>) {
        let mut tasks = lock(&self.tasks);

        if tasks.len() == tasks.capacity() {
            tasks.retain(|t| t.strong_count() > 0);
        }

        tasks.push(task);
    }

    /// Takes the oldest queued task.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.queue).pop_front()
    }

    /// Parks the calling worker until work arrives, shutdown is signalled,
    /// or the park timeout elapses.
    pub(crate) fn park(&self) {
        let queue = lock(&self.queue);

        if self.is_shutdown() || !queue.is_empty() {
            return;
        }

        let _ = self.condvar.wait_timeout(queue, PARK_TIMEOUT);
    }

    /// Removes every queued task so it can be dropped.
    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        lock(&self.queue).drain(..).collect()
    }

    /// Releases every tracked task that has not finished, returning how
    /// many were released.
    ///
    /// Must only be called once no worker can run tasks anymore.
    pub(crate) fn release_all(&self) -> usize {
        let tasks = mem::take(&mut *lock(&self.tasks));

        tasks
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|task| task.release())
            .count()
    }
}
