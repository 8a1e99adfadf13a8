//! Core runtime components.
//!
//! This module holds the cooperative scheduler the launcher runs on:
//! - the [`Runtime`](core::Runtime) and its builder,
//! - the work-stealing executor and its queues,
//! - the task cell, its state machine and its [`Deferred`](task::Deferred)
//!   handle,
//! - the per-thread worker context used to tell suspension-capable code
//!   apart from plain threads.

mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;
pub(crate) mod core;
pub(crate) mod launcher;
pub(crate) mod yield_now;

pub mod task;
