use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};
use std::task::Waker;
use std::time::Instant;

/// A scheduled wake-up stored in the reactor's timer heap.
pub(crate) struct TimerEntry {
    pub(crate) deadline: Instant,
    pub(crate) waker: Waker,

    /// Set by the owning `Sleep` when it is dropped before firing.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl TimerEntry {
    /// Wakes the registered task unless the timer was cancelled.
    pub(crate) fn fire(self) {
        if !self.cancelled.load(atomic::Ordering::Acquire) {
            self.waker.wake();
        }
    }
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest deadline.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
