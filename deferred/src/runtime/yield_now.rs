use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future that hands control back to the scheduler exactly once.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Yields the current task so other queued tasks can run.
///
/// The task is re-queued immediately and resumes on a later scheduling
/// round.
///
/// # Examples
///
/// ```rust,ignore
/// while !ready.load(Ordering::Acquire) {
///     yield_now().await;
/// }
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
