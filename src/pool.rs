//! The pool itself: shared state, construction, submission, and shutdown.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::sync_channel;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;

use crate::builder::ThreadPoolBuilder;
use crate::error::PoolError;
use crate::global_queue::GlobalQueue;
use crate::handle::TaskHandle;
use crate::local_queue::LocalQueue;
use crate::priority::Priority;
use crate::rng::XorShift64Star;
use crate::stats::Stats;
use crate::worker;
use crate::Job;

/// State shared by the pool handle and every worker thread.
pub(crate) struct PoolInner {
    pub(crate) locals: Box<[LocalQueue]>,
    pub(crate) global: GlobalQueue,
    pub(crate) rngs: Box<[XorShift64Star]>,
    next: AtomicUsize,

    pub(crate) stop: AtomicBool,
    pub(crate) immediate_stop: AtomicBool,

    pub(crate) pending: AtomicUsize,
    active: AtomicUsize,
    submitted: AtomicU64,
    completed: AtomicU64,
    pub(crate) stolen: AtomicU64,

    /// Distinct from `global`'s condvar: this is the sole rendezvous point
    /// for `wait_all`, and `pending` is only ever decremented while this
    /// mutex is held, so waiters never miss the transition to zero.
    wait_mutex: Mutex<()>,
    wait_cv: Condvar,

    pub(crate) on_thread_spawn: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
    pub(crate) on_thread_destroy: Option<Arc<dyn Fn() + Send + Sync + 'static>>,
}

impl PoolInner {
    /// Called by a worker immediately after a task finishes running (either
    /// returned normally or was caught by `catch_unwind`).
    pub(crate) fn on_task_complete(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        {
            let _guard = self.wait_mutex.lock().unwrap();
            self.pending.fetch_sub(1, Ordering::AcqRel);
            self.active.fetch_sub(1, Ordering::AcqRel);
        }
        // Notified after releasing the lock is also correct: `wait_all`
        // re-checks the predicate under the same mutex before sleeping
        // again, so a notification that arrives "too early" relative to
        // the unlock is never lost.
        self.wait_cv.notify_all();
    }
}

/// A fixed-size pool of worker threads that execute submitted tasks under
/// three-level static priority with per-worker work-stealing.
///
/// See the [crate-level documentation](crate) for scheduling and shutdown
/// semantics.
pub struct ThreadPool {
    inner: Arc<PoolInner>,
    /// `None` once a shutdown has completed. Holding this mutex across the
    /// whole join makes both shutdown methods idempotent and safe to call
    /// concurrently: whichever caller `take()`s the handles performs the
    /// one join, everyone else observes `None` and returns immediately,
    /// which by then is already correct.
    threads: Mutex<Option<Vec<thread::JoinHandle<()>>>>,
}

impl ThreadPool {
    /// Creates a pool with `num_threads` worker threads and default
    /// configuration.
    ///
    /// # Errors
    /// Returns [`PoolError::ZeroWorkers`] if `num_threads` is zero.
    pub fn new(num_threads: usize) -> Result<Self, PoolError> {
        ThreadPoolBuilder::new().thread_num(num_threads).build()
    }

    pub(crate) fn from_builder(builder: ThreadPoolBuilder) -> Result<Self, PoolError> {
        let n = builder.thread_num.unwrap_or(0);
        if n == 0 {
            return Err(PoolError::ZeroWorkers);
        }

        let locals: Box<[LocalQueue]> = (0..n).map(|_| LocalQueue::new()).collect();
        let rngs: Box<[XorShift64Star]> = (0..n)
            .map(|_| {
                let rng = XorShift64Star::fixed();
                rng.seed_from_entropy();
                rng
            })
            .collect();

        let inner = Arc::new(PoolInner {
            locals,
            global: GlobalQueue::new(),
            rngs,
            next: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            immediate_stop: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            submitted: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            stolen: AtomicU64::new(0),
            wait_mutex: Mutex::new(()),
            wait_cv: Condvar::new(),
            on_thread_spawn: builder.on_thread_spawn.clone(),
            on_thread_destroy: builder.on_thread_destroy.clone(),
        });

        let threads = (0..n)
            .map(|i| {
                let inner = Arc::clone(&inner);
                let name = match &builder.thread_name {
                    Some(prefix) => format!("{prefix} ({i})"),
                    None => format!("taskloom ({i})"),
                };

                let mut thread_builder = thread::Builder::new().name(name);
                if let Some(stack_size) = builder.stack_size {
                    thread_builder = thread_builder.stack_size(stack_size);
                }

                thread_builder
                    .spawn(move || worker::run(inner, i))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        Ok(Self {
            inner,
            threads: Mutex::new(Some(threads)),
        })
    }

    /// Submits `f` at [`Priority::Medium`]. Equivalent to
    /// `submit_priority(Priority::Medium, f)`.
    ///
    /// # Errors
    /// Returns [`PoolError::Stopped`] if the pool is draining or stopped.
    pub fn submit<F, T>(&self, f: F) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit_priority(Priority::Medium, f)
    }

    /// Submits `f` at the given priority.
    ///
    /// `Priority::High` tasks are pushed to the shared global heap and are
    /// picked up by the next worker to go idle, ahead of any
    /// `Medium`/`Low` task already queued. `Medium` and `Low` tasks are
    /// routed round-robin to a worker's own local deque; only that
    /// priority ordering exists between them today (see
    /// [`Priority`](crate::Priority)).
    ///
    /// # Errors
    /// Returns [`PoolError::Stopped`] if the pool is draining or stopped.
    pub fn submit_priority<F, T>(
        &self,
        priority: Priority,
        f: F,
    ) -> Result<TaskHandle<T>, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.inner.stop.load(Ordering::Acquire) {
            return Err(PoolError::Stopped);
        }

        let (tx, rx) = sync_channel(1);
        let job: Job = Box::new(move || {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
            // The receiver may already be gone if the caller dropped its
            // `TaskHandle`; that's fine, there's nobody left to tell.
            let _ = tx.send(result);
        });

        // These three happen-before the push below, so a `wait_all` caller
        // can never observe `pending == 0` while this task is in flight.
        self.inner.submitted.fetch_add(1, Ordering::Relaxed);
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        self.inner.active.fetch_add(1, Ordering::AcqRel);

        match priority {
            Priority::High => {
                self.inner.global.push(priority, job);
                self.inner.global.notify_one();
                log::trace!("submitted a high-priority task to the global heap");
            }
            Priority::Medium | Priority::Low => {
                let k = self.inner.next.fetch_add(1, Ordering::Relaxed) % self.inner.locals.len();
                self.inner.locals[k].push(job);
                self.inner.global.notify_one();
                log::trace!("submitted a task to worker {k}'s local deque");
            }
        }

        Ok(TaskHandle::new(rx))
    }

    /// Blocks until every task submitted so far has completed.
    ///
    /// Does not imply shutdown; further submissions are allowed afterwards,
    /// and a fresh `wait_all` call would wait on those too.
    pub fn wait_all(&self) {
        let guard = self.inner.wait_mutex.lock().unwrap();
        let _guard = self
            .inner
            .wait_cv
            .wait_while(guard, |()| self.inner.pending.load(Ordering::Acquire) != 0)
            .unwrap();
    }

    /// Returns the number of worker threads in the pool.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.inner.locals.len()
    }

    /// Returns the current number of tasks in flight (submitted but not yet
    /// completed). A live gauge, not a cumulative counter.
    #[must_use]
    pub fn active_tasks(&self) -> usize {
        self.inner.active.load(Ordering::Acquire)
    }

    /// Returns the current number of tasks submitted but not yet completed.
    /// A live gauge, not a cumulative counter.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Returns a snapshot of the pool's cumulative counters.
    #[must_use]
    pub fn get_stats(&self) -> Stats {
        Stats {
            submitted: self.inner.submitted.load(Ordering::Relaxed),
            completed: self.inner.completed.load(Ordering::Relaxed),
            stolen: self.inner.stolen.load(Ordering::Relaxed),
        }
    }

    /// Stops accepting new submissions and waits for every already-queued
    /// task to run to completion before returning.
    ///
    /// Idempotent: a second call while or after the first is a correct
    /// no-op.
    pub fn shutdown_graceful(&self) {
        self.inner.stop.store(true, Ordering::Release);
        self.join_workers();
    }

    /// Stops accepting new submissions, lets each worker finish only the
    /// task it is currently running, and discards everything still queued.
    /// Discarded tasks' [`TaskHandle`]s resolve to
    /// [`JoinError::Cancelled`](crate::JoinError::Cancelled).
    ///
    /// Idempotent: a second call while or after the first is a correct
    /// no-op.
    pub fn shutdown_immediate(&self) {
        self.inner.immediate_stop.store(true, Ordering::Release);
        self.inner.stop.store(true, Ordering::Release);
        self.join_workers();

        // Dropping these envelopes drops their `Sender`, which is how a
        // discarded task's `TaskHandle` learns to report `Cancelled`.
        for local in self.inner.locals.iter() {
            drop(local.drain());
        }
        drop(self.inner.global.drain());

        {
            let _guard = self.inner.wait_mutex.lock().unwrap();
            self.inner.pending.store(0, Ordering::Release);
            self.inner.active.store(0, Ordering::Release);
        }
        self.inner.wait_cv.notify_all();
    }

    fn join_workers(&self) {
        let Some(threads) = self.threads.lock().unwrap().take() else {
            // Another call already took and joined them.
            return;
        };

        self.inner.global.notify_all();
        for handle in threads {
            let _ = handle.join();
        }
        log::debug!("all worker threads joined");
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutdown_graceful();
    }
}
