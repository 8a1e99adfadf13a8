use deferred::task::launch;
use deferred::time::sleep;
use deferred::{RuntimeBuilder, TaskError};
use std::panic;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Polls `counter` until it reaches `expected` or a second has passed.
fn wait_for(counter: &AtomicUsize, expected: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(1);

    while counter.load(Ordering::SeqCst) < expected && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }

    counter.load(Ordering::SeqCst)
}

#[test]
fn test_task_survives_panicking_caller() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let result = rt.try_block_on(async move {
        let _handle = launch(async move {
            sleep(Duration::from_millis(50)).await;
            c.fetch_add(1, Ordering::SeqCst);
        });

        if true {
            panic!("caller failed right after launch");
        }
    });

    match result {
        Err(TaskError::Failure { message, .. }) => {
            assert_eq!(message, "caller failed right after launch");
        }
        other => panic!("expected the caller to fail, got {other:?}"),
    }

    assert_eq!(
        counter.load(Ordering::SeqCst),
        0,
        "work should still be sleeping"
    );
    assert_eq!(wait_for(&counter, 1), 1);
}

#[test]
fn test_task_survives_caller_returning_error() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let result = rt.block_on(async move {
        let _handle = launch(async move {
            sleep(Duration::from_millis(30)).await;
            c.fetch_add(1, Ordering::SeqCst);
        });

        Err::<(), &str>("caller gave up")
    });

    assert_eq!(result, Err("caller gave up"));
    assert_eq!(wait_for(&counter, 1), 1);
}

#[test]
fn test_task_survives_panicking_launching_thread() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let launcher = rt.launcher();
    let counter = Arc::new(AtomicUsize::new(0));

    let c = counter.clone();
    let joined = thread::spawn(move || {
        launcher.launch(async move {
            sleep(Duration::from_millis(30)).await;
            c.fetch_add(1, Ordering::SeqCst);
        });

        if true {
            panic!("launching thread died");
        }
    })
    .join();

    assert!(joined.is_err());
    assert_eq!(wait_for(&counter, 1), 1);
}

#[test]
fn test_dropping_handle_does_not_cancel() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    for _ in 0..5 {
        let c = counter.clone();
        drop(rt.launch(async move {
            sleep(Duration::from_millis(10)).await;
            c.fetch_add(1, Ordering::SeqCst);
        }));
    }

    assert_eq!(wait_for(&counter, 5), 5);
}

#[test]
fn test_unawaited_failure_is_absorbed() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();

    drop(rt.launch(async {
        if true {
            panic!("nobody is listening");
        }
    }));

    // The only worker survived the panic and keeps scheduling.
    let after = rt.launch(async { 5 });
    assert_eq!(rt.block_on(async move { after.await }), Ok(5));
}

#[test]
fn test_unawaited_failure_still_reaches_panic_hook() {
    static HOOK_CALLS: AtomicUsize = AtomicUsize::new(0);

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if info.payload().downcast_ref::<&str>() == Some(&"unheard failure") {
            HOOK_CALLS.fetch_add(1, Ordering::SeqCst);
        } else {
            previous(info);
        }
    }));

    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();

    let handle = rt.launch(async {
        if true {
            panic!("unheard failure");
        }
    });

    // The runtime stores the failure; reporting it is left to the hook.
    assert_eq!(wait_for(&HOOK_CALLS, 1), 1);
    drop(handle);

    let after = rt.launch(async { 5 });
    assert_eq!(rt.block_on(async move { after.await }), Ok(5));
}
