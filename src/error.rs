//! Error types returned by [`crate::ThreadPool`] and [`crate::TaskHandle`].

use std::any::Any;
use std::fmt;

/// A synchronous, caller-facing failure from constructing or submitting to a pool.
///
/// These are always returned directly from the call that caused them; they
/// never cross a worker-thread boundary and never mutate pool state.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// [`crate::ThreadPoolBuilder::build`] (or [`crate::ThreadPool::new`]) was asked for zero
    /// worker threads.
    #[error("a thread pool requires at least one worker thread")]
    ZeroWorkers,

    /// A task was submitted while the pool was draining or already stopped.
    #[error("cannot submit a task: the pool is shutting down or has stopped")]
    Stopped,
}

/// The asynchronous outcome recorded on a [`crate::TaskHandle`].
///
/// Returned from [`crate::TaskHandle::join`] and [`crate::TaskHandle::try_join`] whenever the
/// task did not simply return its value.
pub enum JoinError {
    /// The submitted callable panicked. The payload is whatever value was
    /// passed to `panic!` (or the panic hook), exactly as `std::thread::Result`
    /// carries it.
    Panicked(Box<dyn Any + Send + 'static>),

    /// The task was dropped before it started running, because
    /// [`crate::ThreadPool::shutdown_immediate`] discarded it while still queued.
    Cancelled,
}

impl JoinError {
    /// Returns the panic payload downcast to a `&str` or `String`, if the
    /// panic carried one of those (as `panic!("...")` and most panicking
    /// standard-library functions do). Returns `None` for `Cancelled` or for
    /// a panic payload of another type.
    #[must_use]
    pub fn panic_message(&self) -> Option<&str> {
        match self {
            JoinError::Panicked(payload) => payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str)),
            JoinError::Cancelled => None,
        }
    }
}

impl fmt::Debug for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::Panicked(_) => f
                .debug_tuple("Panicked")
                .field(&self.panic_message().unwrap_or("<non-string payload>"))
                .finish(),
            JoinError::Cancelled => f.write_str("Cancelled"),
        }
    }
}

impl fmt::Display for JoinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinError::Panicked(_) => match self.panic_message() {
                Some(msg) => write!(f, "task panicked: {msg}"),
                None => f.write_str("task panicked"),
            },
            JoinError::Cancelled => {
                f.write_str("task was cancelled before it ran (pool was shut down immediately)")
            }
        }
    }
}

impl std::error::Error for JoinError {}
