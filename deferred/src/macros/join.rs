use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};

/// One branch of a `join!`: a future, then its output once ready.
pub enum MaybeDone<F: Future> {
    Pending(Pin<Box<F>>),
    Done(F::Output),
    Taken,
}

impl<F: Future> MaybeDone<F> {
    pub fn new(future: impl IntoFuture<IntoFuture = F>) -> Self {
        MaybeDone::Pending(Box::pin(future.into_future()))
    }

    /// Polls the branch if it is still pending. Returns `true` once its
    /// output is available.
    pub fn poll_done(&mut self, cx: &mut Context<'_>) -> bool {
        if let MaybeDone::Pending(future) = self {
            match future.as_mut().poll(cx) {
                Poll::Ready(output) => *self = MaybeDone::Done(output),
                Poll::Pending => return false,
            }
        }

        matches!(self, MaybeDone::Done(_))
    }

    /// Moves the output out of a finished branch.
    ///
    /// # Panics
    ///
    /// Panics if the branch has not completed or was already taken.
    pub fn take(&mut self) -> F::Output {
        match std::mem::replace(self, MaybeDone::Taken) {
            MaybeDone::Done(output) => output,
            _ => panic!("join branch taken before completion"),
        }
    }
}
