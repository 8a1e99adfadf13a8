use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::task::Waker;
use std::time::Instant;

/// Requests understood by the reactor thread.
pub(crate) enum Command {
    /// Wake `waker` once `deadline` has passed, unless `cancelled` is set first.
    SetTimer {
        deadline: Instant,
        waker: Waker,
        cancelled: Arc<AtomicBool>,
    },

    /// Stop the reactor loop. Pending timers are dropped without firing.
    Shutdown,
}
