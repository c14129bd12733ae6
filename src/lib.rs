//! A fixed-size worker-thread pool with three-level static priority,
//! per-worker work-stealing, and bulk-quiescence waiting.
//!
//! ```
//! use taskloom::{Priority, ThreadPool};
//!
//! let pool = ThreadPool::new(4).unwrap();
//!
//! let handle = pool.submit(|| 2 + 2).unwrap();
//! assert_eq!(handle.join().unwrap(), 4);
//!
//! pool.submit_priority(Priority::High, || {
//!     // urgent work
//! }).unwrap();
//!
//! pool.wait_all();
//! pool.shutdown_graceful();
//! ```
//!
//! # Scheduling
//!
//! Every worker owns a private local deque. [`ThreadPool::submit`] and
//! [`ThreadPool::submit_priority`] with [`Priority::Medium`] or
//! [`Priority::Low`] round-robin across those local deques; a worker drains
//! its own deque LIFO and, finding it empty, tries the shared global heap
//! and then a randomized scan of its peers' deques (FIFO from the thief's
//! point of view). [`Priority::High`] tasks bypass local deques entirely
//! and go straight to the global heap, which every idle worker checks
//! before it tries to steal.
//!
//! # Shutdown
//!
//! [`ThreadPool::shutdown_graceful`] lets every already-queued task run to
//! completion before workers exit. [`ThreadPool::shutdown_immediate`] tells
//! workers to finish only the task they're currently running and discard
//! everything still queued; handles for discarded tasks resolve to
//! [`JoinError::Cancelled`]. Dropping a [`ThreadPool`] without calling
//! either runs a graceful shutdown.

mod builder;
mod error;
mod global_queue;
mod handle;
mod local_queue;
mod pool;
mod priority;
mod rng;
mod stats;
mod worker;

pub use builder::ThreadPoolBuilder;
pub use error::{JoinError, PoolError};
pub use handle::TaskHandle;
pub use pool::ThreadPool;
pub use priority::Priority;
pub use stats::Stats;

/// A type-erased, one-shot unit of work.
///
/// Every queue in this crate stores jobs in this fully-erased form; the
/// generic return value lives only in the [`TaskHandle`] returned to the
/// caller, carried across threads by the `sync_channel` each submission
/// creates for itself.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;
