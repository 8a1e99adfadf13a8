//! Launching tasks and observing their results.
//!
//! - [`launch`] starts work on the current runtime and returns a
//!   [`Deferred`] right away.
//! - Awaiting a [`Deferred`] (directly or through [`Deferred::join`])
//!   suspends until the work completes or fails.
//!
//! The lower-level pieces (the task cell, its state machine and its waker)
//! are internal to the executor.

mod handle;
mod id;
mod state;
mod waker;

pub(crate) mod core;

pub(crate) use self::core::{Runnable, Task};

pub use self::core::launch;
pub use handle::{Deferred, Join};
pub use id::TaskId;
pub use state::TaskState;
