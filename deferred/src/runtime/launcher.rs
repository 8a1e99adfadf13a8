use crate::error::TaskError;
use crate::runtime::context;
use crate::runtime::task::{Deferred, Runnable, Task};
use crate::runtime::work_stealing::injector::InjectorHandle;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Capability to launch work onto one runtime.
///
/// A `Launcher` is cheap to clone, `Send` and `Sync`, and usable from any
/// thread, including threads that are not part of the runtime. It is the
/// handle to pass into "async-style" functions: plain functions that start
/// background work and return a [`Deferred`] without suspending.
///
/// A launcher may outlive its runtime. Work launched after the runtime shut
/// down never runs; its handle is born failed with [`TaskError::Shutdown`].
///
/// # Examples
///
/// ```rust,ignore
/// fn fetch_answer_async(launcher: &Launcher) -> Deferred<u32> {
///     launcher.launch(async {
///         sleep(Duration::from_millis(100)).await;
///         42
///     })
/// }
/// ```
#[derive(Clone)]
pub struct Launcher {
    injector: InjectorHandle,
}

impl Launcher {
    pub(crate) fn new(injector: InjectorHandle) -> Self {
        Self { injector }
    }

    /// Starts `future` in the background and returns its handle.
    ///
    /// Returns immediately; the work may begin before or after this call
    /// returns and keeps running whatever happens to the caller afterwards.
    ///
    /// A panic inside the work is caught and stored on the handle. It goes
    /// through the process panic hook first, like any panic, which by default
    /// prints it to stderr even if the handle is never awaited.
    ///
    /// If the runtime has shut down, the work is dropped without running and
    /// the returned handle has already failed with [`TaskError::Shutdown`].
    pub fn launch<F, T>(&self, future: F) -> Deferred<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        if self.injector.is_shutdown() {
            return self.refuse();
        }

        let task = Arc::new(Task::new(future, self.injector.clone()));
        log::trace!("launching task {}", task.id());

        let runnable: Arc<dyn Runnable> = task.clone();
        self.injector.track(Arc::downgrade(&runnable));

        if let Err(runnable) = context::push_local(&self.injector, runnable) {
            // The runtime may shut down between the check above and here.
            if self.injector.push(runnable).is_err() {
                return self.refuse();
            }
        }

        Deferred::new(task)
    }

    fn refuse<T: Send + 'static>(&self) -> Deferred<T> {
        let task = Arc::new(Task::failed(TaskError::Shutdown, self.injector.clone()));
        log::warn!("task {} launched after runtime shutdown", task.id());

        Deferred::new(task)
    }

    /// Returns `true` once the runtime behind this launcher has shut down.
    pub fn is_shutdown(&self) -> bool {
        self.injector.is_shutdown()
    }
}

impl fmt::Debug for Launcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Launcher")
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}
