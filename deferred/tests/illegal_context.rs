use deferred::task::TaskState;
use deferred::time::sleep;
use deferred::{RuntimeBuilder, TaskError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

#[test]
fn test_join_outside_worker_is_rejected() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let handle = rt.launch(async { 42 });

    let mut join = handle.join();
    let mut cx = Context::from_waker(Waker::noop());

    assert_eq!(
        Pin::new(&mut join).poll(&mut cx),
        Poll::Ready(Err(TaskError::IllegalContext))
    );

    // The rejected poll left the handle usable.
    assert_eq!(rt.block_on(async move { handle.await }), Ok(42));
}

#[test]
fn test_rejected_join_does_not_disturb_pending_task() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let handle = rt.launch(async {
        sleep(Duration::from_millis(50)).await;
        "late"
    });

    let mut cx = Context::from_waker(Waker::noop());
    let polled = Pin::new(&mut handle.join()).poll(&mut cx);

    assert_eq!(polled, Poll::Ready(Err(TaskError::IllegalContext)));
    assert_eq!(handle.state(), TaskState::Pending);

    let waiter = handle.clone();
    assert_eq!(rt.block_on(async move { waiter.await }), Ok("late"));
    assert_eq!(handle.state(), TaskState::Completed);
}

#[test]
fn test_block_on_from_worker_is_rejected() {
    let outer = RuntimeBuilder::new().worker_threads(1).build().unwrap();
    let inner = Arc::new(RuntimeBuilder::new().worker_threads(1).build().unwrap());

    let nested = inner.clone();
    let result = outer.block_on(async move { nested.try_block_on(async { 1 }) });

    assert_eq!(result, Err(TaskError::IllegalContext));

    // Blocking from a plain thread is still fine.
    assert_eq!(inner.try_block_on(async { 2 }), Ok(2));
}
