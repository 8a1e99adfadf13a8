//! Async-style functions: launch two computations without suspending,
//! then join both from a runtime task.
//!
//! `something_useful_*_async` are plain functions and can be called from
//! anywhere. The flip side: if the caller failed between launching and
//! awaiting, both computations would keep running in the background.

use deferred::task::Deferred;
use deferred::time::sleep;
use deferred::{Launcher, RuntimeBuilder, TaskError};
use std::error::Error;
use std::time::{Duration, Instant};

fn something_useful_one_async(launcher: &Launcher) -> Deferred<u32> {
    launcher.launch(do_something_useful_one())
}

fn something_useful_two_async(launcher: &Launcher) -> Deferred<u32> {
    launcher.launch(do_something_useful_two())
}

async fn do_something_useful_one() -> u32 {
    sleep(Duration::from_secs(1)).await;
    13
}

async fn do_something_useful_two() -> u32 {
    sleep(Duration::from_secs(1)).await;
    29
}

fn main() -> Result<(), Box<dyn Error>> {
    let runtime = RuntimeBuilder::new().build()?;
    let launcher = runtime.launcher();

    let start = Instant::now();

    let one = something_useful_one_async(&launcher);
    let two = something_useful_two_async(&launcher);

    let answer = runtime.block_on(async move { Ok::<_, TaskError>(one.await? + two.await?) })?;
    println!("The answer is {answer}");

    println!("Completed in {} ms", start.elapsed().as_millis());

    Ok(())
}
