use super::core::Runtime;
use crate::error::RuntimeError;

use std::thread;

const DEFAULT_THREAD_NAME: &str = "deferred-worker";

/// Builder for configuring and creating a [`Runtime`].
///
/// # Examples
///
/// ```rust,ignore
/// let runtime = RuntimeBuilder::new()
///     .worker_threads(4)
///     .thread_name("answers")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeBuilder {
    worker_threads: usize,
    thread_name: String,
}

impl RuntimeBuilder {
    /// Creates a builder with one worker per available logical CPU,
    /// falling back to a single worker when that cannot be determined.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }

    /// Sets the number of worker threads.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Sets the name prefix of runtime threads.
    ///
    /// Workers are named `"{name}-{id}"` and the reactor `"{name}-reactor"`.
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Starts the reactor and the workers.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Spawn`] if a thread could not be started.
    pub fn build(self) -> Result<Runtime, RuntimeError> {
        Runtime::new(self.worker_threads, &self.thread_name)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
