//! Time utilities driven by the runtime reactor.
//!
//! - [`sleep`] suspends the current task until a deadline,
//! - [`timed`] measures how long a future takes to complete.

mod sleep;
mod timed;

#[doc(inline)]
pub use sleep::{Sleep, sleep};

#[doc(inline)]
pub use timed::{Timed, timed};
