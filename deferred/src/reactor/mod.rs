//! Reactor core and timer handling.
//!
//! The reactor runs on its own thread, independently from the executor.
//! It owns every pending timer and wakes the task that registered it once
//! the deadline is reached.
//!
//! Runtime components talk to it exclusively through [`Command`]s sent
//! over a [`ReactorHandle`]; most users never touch this module directly.

mod core;
mod timer;

pub(crate) mod command;

pub(crate) use self::core::{Reactor, ReactorHandle};
