//! Per-worker local deque.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::Job;

/// A worker's private double-ended queue.
///
/// The owning worker pushes and pops at the "near" end (the back), giving
/// LIFO order for its own work. Every other worker may steal from the "far"
/// end (the front), giving FIFO order to thieves. All three operations take
/// the same mutex rather than a lock-free Chase-Lev deque, keeping the
/// stealing protocol easy to audit. Real parallelism survives because only
/// the owner ever pushes, so a burst of submissions to one worker never
/// serializes against another worker's deque.
pub(crate) struct LocalQueue {
    deque: Mutex<VecDeque<Job>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            deque: Mutex::new(VecDeque::new()),
        }
    }

    /// Pushes at the near end. Called only by the owning worker (via the
    /// submission front-end targeting this worker by index).
    pub(crate) fn push(&self, job: Job) {
        self.deque.lock().unwrap().push_back(job);
    }

    /// Pops from the near end. Called only by the owning worker.
    pub(crate) fn pop(&self) -> Option<Job> {
        self.deque.lock().unwrap().pop_back()
    }

    /// Steals from the far end. Called only by non-owner workers.
    pub(crate) fn steal(&self) -> Option<Job> {
        self.deque.lock().unwrap().pop_front()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.deque.lock().unwrap().len()
    }

    /// Pops every remaining job, in no particular order, for use during
    /// immediate shutdown. Leaves the deque empty.
    pub(crate) fn drain(&self) -> Vec<Job> {
        self.deque.lock().unwrap().drain(..).collect()
    }
}
