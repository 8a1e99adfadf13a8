//! Work-stealing queues.
//!
//! - [`injector`]: the shared queue every launch from outside a worker goes
//!   through, which also parks idle workers.
//! - [`queue`]: one local queue per worker, popped LIFO by its owner and
//!   stolen FIFO by its peers.

pub(crate) mod injector;
pub(crate) mod queue;
