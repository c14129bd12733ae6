//! Configurable construction of a [`crate::ThreadPool`].

use std::sync::Arc;

use crate::error::PoolError;
use crate::pool::ThreadPool;

/// Builder for creating a [`ThreadPool`] with non-default configuration.
///
/// Currently configurable parameters:
///
/// - [`thread_num`]: number of worker threads. Required; [`build`] fails if
///   unset or zero.
/// - [`thread_name`]: thread name prefix. Threads are named
///   `{thread_name} ({i})`. Default: `taskloom ({i})`.
/// - [`stack_size`]: stack size for worker threads. Default is
///   platform-dependent.
/// - [`on_thread_spawn`] / [`on_thread_destroy`]: callbacks run once on each
///   worker thread, at start and just before exit.
///
/// [`thread_num`]: Self::thread_num
/// [`thread_name`]: Self::thread_name
/// [`stack_size`]: Self::stack_size
/// [`build`]: Self::build
/// [`on_thread_spawn`]: Self::on_thread_spawn
/// [`on_thread_destroy`]: Self::on_thread_destroy
///
/// # Examples
///
/// ```
/// use taskloom::ThreadPoolBuilder;
///
/// let pool = ThreadPoolBuilder::new()
///     .thread_num(4)
///     .thread_name("worker".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.num_threads(), 4);
/// ```
#[derive(Default)]
#[must_use]
pub struct ThreadPoolBuilder {
    pub(crate) thread_num: Option<usize>,
    pub(crate) stack_size: Option<usize>,
    pub(crate) thread_name: Option<String>,
    pub(crate) on_thread_spawn: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
    pub(crate) on_thread_destroy: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
}

impl ThreadPoolBuilder {
    /// Creates a new, unconfigured builder.
    pub const fn new() -> Self {
        Self {
            thread_num: None,
            stack_size: None,
            thread_name: None,
            on_thread_spawn: None,
            on_thread_destroy: None,
        }
    }

    /// Sets the number of worker threads. [`build`](Self::build) fails if
    /// this is zero or never set.
    pub fn thread_num(mut self, thread_num: usize) -> Self {
        self.thread_num = Some(thread_num);
        self
    }

    /// Overrides the stack size of every worker thread.
    pub fn stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = Some(stack_size);
        self
    }

    /// Sets the thread name prefix; threads are named `{thread_name} ({i})`.
    pub fn thread_name(mut self, thread_name: String) -> Self {
        self.thread_name = Some(thread_name);
        self
    }

    /// Sets a callback invoked once on each worker thread, before it starts
    /// taking tasks.
    pub fn on_thread_spawn(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_thread_spawn = Some(Arc::new(f));
        self
    }

    /// Sets a callback invoked once on each worker thread, after it has
    /// stopped taking tasks but before the thread exits.
    pub fn on_thread_destroy(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_thread_destroy = Some(Arc::new(f));
        self
    }

    /// Builds the pool, spawning one OS thread per configured worker.
    ///
    /// # Errors
    /// Returns [`PoolError::ZeroWorkers`] if `thread_num` was unset or zero.
    pub fn build(self) -> Result<ThreadPool, PoolError> {
        ThreadPool::from_builder(self)
    }
}
