use deferred::RuntimeBuilder;
use deferred::task::launch;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

#[test]
fn test_single_worker_thread() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();

    assert_eq!(rt.worker_threads(), 1);
    assert_eq!(rt.block_on(async { 42 }), 42);
}

#[test]
fn test_multiple_worker_threads() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    assert_eq!(rt.worker_threads(), 4);
    assert_eq!(rt.block_on(async { 100 }), 100);
}

#[test]
fn test_worker_threads_parallel_execution() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let results = Arc::new(Mutex::new(Vec::new()));
    let results_clone = results.clone();

    let doubled = rt.block_on(async move {
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let results = results_clone.clone();

                launch(async move {
                    results.lock().unwrap().push(i);
                    i * 2
                })
            })
            .collect();

        let mut doubled = Vec::new();
        for handle in handles {
            doubled.push(handle.await.unwrap());
        }
        doubled
    });

    assert_eq!(doubled, (0..10).map(|i| i * 2).collect::<Vec<_>>());
    assert_eq!(results.lock().unwrap().len(), 10);
}

#[test]
fn test_worker_threads_stress() {
    let rt = RuntimeBuilder::new().worker_threads(8).build().unwrap();

    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let counter = counter_clone.clone();
                launch(async move {
                    *counter.lock().unwrap() += 1;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    });

    assert_eq!(*counter.lock().unwrap(), 100);
}

#[test]
fn test_worker_threads_max_parallelism() {
    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let rt = RuntimeBuilder::new()
        .worker_threads(num_threads)
        .build()
        .unwrap();

    let result = rt.block_on(async {
        let handles: Vec<_> = (1..=10).map(|i| launch(async move { i })).collect();

        let mut sum = 0;
        for handle in handles {
            sum += handle.await.unwrap();
        }
        sum
    });

    assert_eq!(result, 55);
}

#[test]
fn test_worker_threads_chain_launch() {
    let rt = RuntimeBuilder::new().worker_threads(4).build().unwrap();

    let result = rt.block_on(async {
        let handle1 = launch(async {
            let handle2 = launch(async {
                let handle3 = launch(async { 10 });
                handle3.await.unwrap() + 20
            });
            handle2.await.unwrap() + 30
        });
        handle1.await.unwrap() + 40
    });

    assert_eq!(result, 100);
}

#[test]
fn test_worker_threads_two_threads() {
    let rt = RuntimeBuilder::new().worker_threads(2).build().unwrap();

    let completed = Arc::new(Mutex::new(HashSet::new()));
    let completed_clone = completed.clone();

    rt.block_on(async move {
        let handles: Vec<_> = (0..20)
            .map(|i| {
                let completed = completed_clone.clone();
                launch(async move {
                    completed.lock().unwrap().insert(i);
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    });

    let set = completed.lock().unwrap();
    assert_eq!(set.len(), 20);
    for i in 0..20 {
        assert!(set.contains(&i), "Task {} should have completed", i);
    }
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_worker_threads_zero_panics() {
    let _ = RuntimeBuilder::new().worker_threads(0).build();
}

#[test]
fn test_worker_threads_sequential_runtimes() {
    for n in 1..=4 {
        let rt = RuntimeBuilder::new().worker_threads(n).build().unwrap();
        let result = rt.block_on(async move { n * 10 });
        assert_eq!(result, n * 10);
        drop(rt);
    }
}

#[test]
fn test_worker_threads_are_named() {
    let rt = RuntimeBuilder::new()
        .worker_threads(2)
        .thread_name("answers")
        .build()
        .unwrap();

    let name = rt.block_on(async { thread::current().name().map(str::to_owned) });

    let name = name.expect("worker threads should be named");
    assert!(
        name == "answers-0" || name == "answers-1",
        "unexpected worker name {name}"
    );
}
