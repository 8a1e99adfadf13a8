//! # Deferred
//!
//! **Deferred** provides fire-and-forget task launching with awaitable
//! handles, on top of a small cooperative runtime from the **Nebula**
//! ecosystem.
//!
//! An *async-style function* is a plain function that starts background work
//! and returns a [`Deferred`](task::Deferred) handle without suspending. The
//! caller continues with unrelated work and awaits the handles later. Because
//! every launch starts running right away, awaiting two one-second tasks one
//! after the other takes about one second, not two.
//!
//! Launched work is **detached**: it is not cancelled when the caller fails,
//! returns early, or drops the handle. A failure nobody awaits never crashes
//! the program and the runtime logs nothing about it. The process panic hook
//! still runs when the work panics, so the default hook prints the panic
//! message to stderr. This is the documented trade-off of the pattern.
//!
//! The runtime offers:
//!
//! - A **work-stealing scheduler** multiplexing tasks onto worker threads
//! - **Deferred handles** that can be awaited any number of times
//! - **Timers** (`sleep`) served by a reactor thread
//! - **Macros**: `#[deferred::main]`, `#[deferred::test]` and `join!`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deferred::time::sleep;
//! use deferred::{Launcher, RuntimeBuilder, TaskError};
//! use deferred::task::Deferred;
//! use std::time::Duration;
//!
//! fn answer_part_async(launcher: &Launcher, part: u32) -> Deferred<u32> {
//!     launcher.launch(async move {
//!         sleep(Duration::from_secs(1)).await;
//!         part
//!     })
//! }
//!
//! let runtime = RuntimeBuilder::new().build()?;
//! let launcher = runtime.launcher();
//!
//! let one = answer_part_async(&launcher, 13);
//! let two = answer_part_async(&launcher, 29);
//!
//! let answer = runtime.block_on(async move {
//!     Ok::<_, TaskError>(one.await? + two.await?)
//! })?;
//! assert_eq!(answer, 42);
//! ```
//!
//! ## Modules
//!
//! - [`task`] — Launching work and awaiting deferred handles
//! - [`time`] — Sleep and elapsed-time measurement

mod error;
mod macros;
mod reactor;
mod runtime;
mod utils;

pub mod time;

pub use error::{RuntimeError, TaskError};
pub use runtime::builder::RuntimeBuilder;
pub use runtime::core::Runtime;
pub use runtime::launcher::Launcher;
pub use runtime::task;
pub use runtime::yield_now::yield_now;

pub use deferred_macros::*;

#[doc(hidden)]
pub mod __private {
    pub use crate::macros::MaybeDone;
}
