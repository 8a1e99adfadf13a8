use crate::reactor::ReactorHandle;
use crate::runtime::context::WorkerContext;
use crate::runtime::executor::worker::Worker;
use crate::runtime::launcher::Launcher;
use crate::runtime::work_stealing::injector::{Injector, InjectorHandle};
use crate::runtime::work_stealing::queue::LocalQueue;

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Multi-threaded work-stealing executor.
///
/// Owns the injector, one local queue per worker, and the worker threads.
pub(crate) struct Executor {
    injector: InjectorHandle,
    locals: Arc<Vec<Arc<LocalQueue>>>,
    handles: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Spawns `threads` workers named `"{name}-{id}"`.
    ///
    /// If a thread cannot be spawned, the workers already running are shut
    /// down and joined before the error is returned.
    pub(crate) fn new(reactor: ReactorHandle, threads: usize, name: &str) -> io::Result<Self> {
        let injector = Arc::new(Injector::new());
        let locals: Arc<Vec<_>> = Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let mut executor = Self {
            injector,
            locals,
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let worker = Worker::new(WorkerContext {
                id,
                locals: executor.locals.clone(),
                injector: executor.injector.clone(),
                reactor: reactor.clone(),
            });

            let spawned = thread::Builder::new()
                .name(format!("{name}-{id}"))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => executor.handles.push(handle),
                Err(err) => {
                    executor.shutdown();
                    executor.join();
                    return Err(err);
                }
            }
        }

        Ok(executor)
    }

    pub(crate) fn launcher(&self) -> Launcher {
        Launcher::new(self.injector.clone())
    }

    pub(crate) fn worker_threads(&self) -> usize {
        self.locals.len()
    }

    /// Stops task intake and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Joins every worker, then releases the tasks that never finished.
    ///
    /// Queued tasks hold a reference to the injector, and suspended tasks
    /// awaiting each other hold references to one another through join
    /// wakers. Both are broken here once no worker can run them.
    pub(crate) fn join(&mut self) {
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }

        let mut dropped = self.injector.drain().len();
        for local in self.locals.iter() {
            dropped += local.drain().len();
        }

        if dropped > 0 {
            log::debug!("dropped {dropped} queued tasks at shutdown");
        }

        let released = self.injector.release_all();

        if released > 0 {
            log::debug!("released {released} unfinished tasks at shutdown");
        }
    }
}
