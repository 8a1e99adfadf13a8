//! The same scenario written inside `#[deferred::main]`, joining both
//! handles concurrently with `join!`.

use deferred::join;
use deferred::task::launch;
use deferred::time::{sleep, timed};
use std::time::Duration;

#[deferred::main(worker_threads = 2)]
async fn main() {
    let one = launch(async {
        sleep(Duration::from_secs(1)).await;
        13u32
    });
    let two = launch(async {
        sleep(Duration::from_secs(1)).await;
        29u32
    });

    let ((one, two), elapsed) = timed(async move { join!(one, two) }).await;

    match (one, two) {
        (Ok(one), Ok(two)) => println!("The answer is {}", one + two),
        (Err(err), _) | (_, Err(err)) => eprintln!("a computation failed: {err}"),
    }

    println!("Completed in {} ms", elapsed.as_millis());
}
