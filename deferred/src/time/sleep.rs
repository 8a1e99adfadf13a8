use crate::reactor::command::Command;
use crate::runtime::context;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Creates a future that completes after `duration`.
///
/// The current task is suspended, not the worker thread: other tasks keep
/// running while it sleeps.
///
/// # Panics
///
/// The returned future panics if polled outside of a runtime worker.
///
/// # Examples
///
/// ```rust,ignore
/// sleep(Duration::from_millis(10)).await;
/// ```
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now() + duration,
        registered: false,
        cancelled: Arc::new(AtomicBool::new(false)),
    }
}

/// Future returned by [`sleep`].
///
/// The timer is registered with the reactor on first poll. Dropping the
/// future before it fires cancels the timer.
pub struct Sleep {
    deadline: Instant,
    registered: bool,

    /// Shared with the reactor's timer entry.
    cancelled: Arc<AtomicBool>,
}

impl Sleep {
    /// The instant at which this sleep completes.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        if Instant::now() >= this.deadline {
            return Poll::Ready(());
        }

        if !this.registered {
            let reactor = context::current_reactor().expect("Sleep polled outside of a runtime");

            let _ = reactor.send(Command::SetTimer {
                deadline: this.deadline,
                waker: cx.waker().clone(),
                cancelled: this.cancelled.clone(),
            });

            this.registered = true;
        }

        Poll::Pending
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
