use crate::runtime::task::Runnable;
use crate::utils::lock;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Per-worker run queue.
///
/// The owning worker pushes and pops at the back, so the most recently
/// launched task runs first while its data is still warm. Peers steal
/// from the front.
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Arc<dyn Runnable>>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, task: Arc<dyn Runnable>) {
        lock(&self.inner).push_back(task);
    }

    /// Owner side: newest task first.
    pub(crate) fn pop(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.inner).pop_back()
    }

    /// Thief side: oldest task first.
    pub(crate) fn steal(&self) -> Option<Arc<dyn Runnable>> {
        lock(&self.inner).pop_front()
    }

    pub(crate) fn drain(&self) -> Vec<Arc<dyn Runnable>> {
        lock(&self.inner).drain(..).collect()
    }
}
