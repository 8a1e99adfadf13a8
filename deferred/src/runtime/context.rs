use crate::reactor::ReactorHandle;
use crate::runtime::launcher::Launcher;
use crate::runtime::task::Runnable;
use crate::runtime::work_stealing::injector::InjectorHandle;
use crate::runtime::work_stealing::queue::LocalQueue;

use std::cell::RefCell;
use std::sync::Arc;

/// Runtime state installed on every worker thread.
#[derive(Clone)]
pub(crate) struct WorkerContext {
    /// Index of this worker in `locals`.
    pub(crate) id: usize,

    /// Local queues of every worker of the runtime.
    pub(crate) locals: Arc<Vec<Arc<LocalQueue>>>,

    pub(crate) injector: InjectorHandle,

    pub(crate) reactor: ReactorHandle,
}

thread_local! {
    /// Context of the worker running on this thread, if any.
    ///
    /// Lets timers, launches and join futures reach the runtime without
    /// threading handles through every call.
    static CURRENT: RefCell<Option<WorkerContext>> = const { RefCell::new(None) };
}

/// Installs `context` for the duration of `f`, restoring the previous one
/// afterwards.
pub(crate) fn enter<R>(context: WorkerContext, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT.with(|cell| cell.replace(Some(context)));
    let out = f();
    CURRENT.with(|cell| cell.replace(previous));
    out
}

/// Returns `true` on a runtime worker thread, the only place a task may
/// suspend.
pub(crate) fn on_worker() -> bool {
    CURRENT.with(|cell| cell.borrow().is_some())
}

pub(crate) fn current_reactor() -> Option<ReactorHandle> {
    CURRENT.with(|cell| cell.borrow().as_ref().map(|c| c.reactor.clone()))
}

pub(crate) fn current_launcher() -> Option<Launcher> {
    CURRENT.with(|cell| {
        cell.borrow()
            .as_ref()
            .map(|c| Launcher::new(c.injector.clone()))
    })
}

/// Pushes `task` to the current worker's local queue if that worker belongs
/// to the runtime owning `injector`. Hands the task back otherwise.
pub(crate) fn push_local(
    injector: &InjectorHandle,
    task: Arc<dyn Runnable>,
) -> Result<(), Arc<dyn Runnable>> {
    CURRENT.with(|cell| match cell.borrow().as_ref() {
        Some(context) if Arc::ptr_eq(&context.injector, injector) => {
            context.locals[context.id].push(task);
            Ok(())
        }
        _ => Err(task),
    })
}
