use crate::runtime::context::{self, WorkerContext};
use crate::runtime::task::Runnable;

use std::sync::Arc;

/// One scheduling thread of the executor.
///
/// Work is looked up in this order:
/// 1. the worker's own local queue (newest first),
/// 2. the global injector,
/// 3. the local queues of the other workers, round-robin,
///
/// and the worker parks on the injector when all of them are empty.
pub(crate) struct Worker {
    context: WorkerContext,
}

impl Worker {
    pub(crate) fn new(context: WorkerContext) -> Self {
        Self { context }
    }

    /// Runs the scheduling loop until the injector is shut down.
    pub(crate) fn run(self) {
        let id = self.context.id;
        log::debug!("worker {id} started");

        context::enter(self.context.clone(), || {
            while !self.context.injector.is_shutdown() {
                match self.next_task() {
                    Some(task) => task.run(),
                    None => self.context.injector.park(),
                }
            }
        });

        log::debug!("worker {id} stopped");
    }

    fn next_task(&self) -> Option<Arc<dyn Runnable>> {
        let ctx = &self.context;

        ctx.locals[ctx.id]
            .pop()
            .or_else(|| ctx.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// Steals the oldest task of the first non-empty peer queue.
    fn try_steal(&self) -> Option<Arc<dyn Runnable>> {
        let ctx = &self.context;
        let len = ctx.locals.len();

        (1..len)
            .map(|offset| (ctx.id + offset) % len)
            .find_map(|victim| ctx.locals[victim].steal())
    }
}
