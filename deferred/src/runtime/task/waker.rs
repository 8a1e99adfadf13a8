use crate::runtime::task::Task;

use std::sync::Arc;
use std::task::{Wake, Waker};

impl<T: Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.schedule();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().schedule();
    }
}

/// Creates a [`Waker`] that reschedules `task` on its runtime when woken.
///
/// Each clone of the waker holds a strong reference to the task, so a task
/// suspended on a timer stays alive for as long as the timer does.
pub(crate) fn make_waker<T: Send + 'static>(task: Arc<Task<T>>) -> Waker {
    Waker::from(task)
}
