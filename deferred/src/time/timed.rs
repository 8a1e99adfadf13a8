use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Wraps `future` so that it resolves to `(output, elapsed)`.
///
/// The clock starts on the first poll, so building the wrapper early does
/// not skew the measurement.
///
/// # Examples
///
/// ```rust,ignore
/// let (answer, elapsed) = timed(async { one.await? + two.await? }).await;
/// println!("answer {answer:?} in {} ms", elapsed.as_millis());
/// ```
pub fn timed<F: Future>(future: F) -> Timed<F> {
    Timed {
        future: Box::pin(future),
        started: None,
    }
}

/// Future returned by [`timed`].
pub struct Timed<F> {
    future: Pin<Box<F>>,
    started: Option<Instant>,
}

impl<F: Future> Future for Timed<F> {
    type Output = (F::Output, Duration);

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let started = *self.started.get_or_insert_with(Instant::now);

        self.future
            .as_mut()
            .poll(cx)
            .map(|output| (output, started.elapsed()))
    }
}
