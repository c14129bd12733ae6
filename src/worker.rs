//! The per-thread execution loop.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use crate::pool::PoolInner;

/// How long a worker with nothing to do waits on the global condition
/// variable before re-checking every source on its own.
///
/// Local-deque pushes and steals don't notify that condvar on every
/// operation, so this is the bound on how stale a worker's view of the
/// world is allowed to get, not a busy-spin interval.
const PARK_TIMEOUT: Duration = Duration::from_millis(10);

/// Runs on a dedicated OS thread for the lifetime of the pool (or until
/// shutdown). `id` indexes this worker's own local deque and RNG within
/// `pool`.
pub(crate) fn run(pool: Arc<PoolInner>, id: usize) {
    log::debug!("worker {id} started");

    if let Some(hook) = pool.on_thread_spawn.as_ref() {
        hook();
    }

    loop {
        if pool.immediate_stop.load(Ordering::Acquire) {
            log::trace!("worker {id} observed immediate stop, exiting");
            break;
        }

        if let Some(job) = fetch_job(&pool, id) {
            job();
            pool.on_task_complete();
            continue;
        }

        if pool.stop.load(Ordering::Acquire) && pool.pending.load(Ordering::Acquire) == 0 {
            log::trace!("worker {id} observed graceful stop with no pending work, exiting");
            break;
        }

        pool.global.park(PARK_TIMEOUT);
    }

    if let Some(hook) = pool.on_thread_destroy.as_ref() {
        hook();
    }

    log::debug!("worker {id} stopped");
}

/// Attempts to obtain one task, trying sources in order: the shared global
/// heap, this worker's own local deque, then a randomized scan of every
/// other worker's local deque.
fn fetch_job(pool: &Arc<PoolInner>, id: usize) -> Option<crate::Job> {
    if let Some(job) = pool.global.pop() {
        return Some(job);
    }

    if let Some(job) = pool.locals[id].pop() {
        return Some(job);
    }

    steal(pool, id)
}

/// Scans every other worker's local deque, starting from a random index, and
/// steals from the first one that yields a task.
fn steal(pool: &Arc<PoolInner>, id: usize) -> Option<crate::Job> {
    let n = pool.locals.len();
    if n <= 1 {
        return None;
    }

    let start = pool.rngs[id].next_usize(n);
    for offset in 0..n {
        let victim = (start + offset) % n;
        if victim == id {
            continue;
        }
        if let Some(job) = pool.locals[victim].steal() {
            pool.stolen.fetch_add(1, Ordering::Relaxed);
            log::trace!("worker {id} stole a task from worker {victim}");
            return Some(job);
        }
    }

    None
}
