use super::executor::core::Executor;
use super::launcher::Launcher;
use crate::error::{RuntimeError, TaskError};
use crate::reactor::command::Command;
use crate::reactor::{Reactor, ReactorHandle};
use crate::runtime::context;
use crate::runtime::task::Deferred;

use std::future::Future;
use std::sync::mpsc;
use std::thread::JoinHandle;

/// The cooperative scheduler every launch runs on.
///
/// `Runtime` owns:
/// - a work-stealing executor multiplexing tasks onto worker threads,
/// - a reactor thread serving timers,
/// - the [`Launcher`] used to start background work.
///
/// The runtime is an explicit value, not process-wide state: whoever builds
/// it decides how long it lives. Dropping it stops the workers and the
/// reactor and joins their threads.
pub struct Runtime {
    executor: Executor,
    launcher: Launcher,
    reactor: ReactorHandle,
    reactor_thread: Option<JoinHandle<()>>,
}

impl Runtime {
    pub(crate) fn new(worker_threads: usize, thread_name: &str) -> Result<Self, RuntimeError> {
        let (reactor, reactor_thread) = Reactor::start(thread_name)?;

        let executor = match Executor::new(reactor.clone(), worker_threads, thread_name) {
            Ok(executor) => executor,
            Err(err) => {
                let _ = reactor.send(Command::Shutdown);
                let _ = reactor_thread.join();
                return Err(err.into());
            }
        };

        log::debug!("runtime started with {worker_threads} workers");

        Ok(Self {
            launcher: executor.launcher(),
            executor,
            reactor,
            reactor_thread: Some(reactor_thread),
        })
    }

    /// Returns a launcher bound to this runtime.
    pub fn launcher(&self) -> Launcher {
        self.launcher.clone()
    }

    /// Number of worker threads driving tasks.
    pub fn worker_threads(&self) -> usize {
        self.executor.worker_threads()
    }

    /// Starts `future` in the background and returns its handle.
    ///
    /// Shorthand for `self.launcher().launch(future)`.
    pub fn launch<F, T>(&self, future: F) -> Deferred<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.launcher.launch(future)
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// This is the synchronous entry point into the runtime, typically used
    /// from `main` or from tests. The future runs as a task on a worker, so
    /// it may await deferred handles.
    ///
    /// # Panics
    ///
    /// Panics if the future panics, or if called from a runtime worker.
    /// See [`try_block_on`](Self::try_block_on) for the non-panicking form.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let result = runtime.block_on(async { 42 });
    /// assert_eq!(result, 42);
    /// ```
    pub fn block_on<F>(&self, future: F) -> F::Output
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        match self.try_block_on(future) {
            Ok(output) => output,
            Err(err) => panic!("block_on failed: {err}"),
        }
    }

    /// Runs a future to completion, blocking the current thread.
    ///
    /// # Errors
    ///
    /// - [`TaskError::IllegalContext`] when called from a worker thread,
    ///   where blocking would stall the scheduler.
    /// - [`TaskError::Failure`] when the future panicked.
    pub fn try_block_on<F>(&self, future: F) -> Result<F::Output, TaskError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if context::on_worker() {
            return Err(TaskError::IllegalContext);
        }

        let (transmitter, receiver) = mpsc::channel();

        let task = self.launch(async move {
            let output = future.await;
            let _ = transmitter.send(output);
        });

        task.wait()?;

        receiver.recv().map_err(|_| TaskError::Shutdown)
    }
}

impl Drop for Runtime {
    /// Shuts the runtime down:
    /// 1. stops task intake and wakes the workers,
    /// 2. stops the reactor, dropping pending timers,
    /// 3. joins the workers and drops the futures of unfinished tasks,
    /// 4. joins the reactor thread.
    fn drop(&mut self) {
        self.executor.shutdown();

        let _ = self.reactor.send(Command::Shutdown);

        self.executor.join();

        if let Some(thread) = self.reactor_thread.take() {
            let _ = thread.join();
        }

        log::debug!("runtime shut down");
    }
}
