//! The shared, priority-ordered global queue and its parking condition variable.

use std::collections::BinaryHeap;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

use crate::{Job, Priority};

/// One entry in the global heap: a job tagged with its priority and an
/// insertion sequence number.
///
/// The sequence number breaks ties within a priority class in FIFO order,
/// so that if this heap is ever asked to carry more than `High` priority it
/// does not starve later classes. `Ord` is implemented by hand because `Job`
/// itself has no meaningful ordering and must not participate in it.
struct HeapItem {
    priority: Priority,
    seq: u64,
    job: Job,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, and `Priority::High` is the greatest
        // variant, so ordering by priority alone already pops High first.
        // Within a priority class, the *smaller* sequence number must sort
        // as the *greater* item so it's popped first (FIFO), hence the
        // reversed comparison on `seq`.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// The pool-wide priority queue, plus the condition variable every worker
/// parks on when it finds no work anywhere.
///
/// This type holds the heap and the park condvar; it does not notify on its
/// own. The submission front-end and the shutdown path call [`Self::notify_one`]
/// or [`Self::notify_all`] after a push or a lifecycle transition that might
/// let a worker stop waiting, whether the push landed here or in a local
/// deque, so the condvar stays the single rendezvous point for new work or a
/// state change.
pub(crate) struct GlobalQueue {
    heap: Mutex<BinaryHeap<HeapItem>>,
    parked: Condvar,
    next_seq: AtomicU64,
}

impl GlobalQueue {
    pub(crate) fn new() -> Self {
        Self {
            heap: Mutex::new(BinaryHeap::new()),
            parked: Condvar::new(),
            next_seq: AtomicU64::new(0),
        }
    }

    pub(crate) fn push(&self, priority: Priority, job: Job) {
        let seq = self.next_seq.fetch_add(1, AtomicOrdering::Relaxed);
        self.heap.lock().unwrap().push(HeapItem { priority, seq, job });
    }

    pub(crate) fn pop(&self) -> Option<Job> {
        self.heap.lock().unwrap().pop().map(|item| item.job)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.heap.lock().unwrap().len()
    }

    pub(crate) fn notify_one(&self) {
        self.parked.notify_one();
    }

    pub(crate) fn notify_all(&self) {
        self.parked.notify_all();
    }

    /// Parks the calling worker for up to `timeout`, or until notified.
    ///
    /// This is a bounded liveness backstop, not an airtight wait: a push to
    /// a *local* deque doesn't always land before a worker finishes
    /// checking every source and parks, so a worker that missed a wakeup
    /// must re-poll on a bound rather than sleep forever.
    pub(crate) fn park(&self, timeout: Duration) {
        let guard = self.heap.lock().unwrap();
        let _ = self.parked.wait_timeout(guard, timeout).unwrap();
    }

    /// Drains every job currently in the heap, in no particular order, for
    /// use during immediate shutdown.
    pub(crate) fn drain(&self) -> Vec<Job> {
        let mut heap = self.heap.lock().unwrap();
        std::mem::take(&mut *heap).into_vec().into_iter().map(|item| item.job).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::GlobalQueue;
    use crate::Priority;
    use std::sync::{Arc, Mutex};

    #[test]
    fn high_priority_pops_before_lower_ones_inserted_earlier() {
        let q = GlobalQueue::new();
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::default();
        {
            let log = log.clone();
            q.push(Priority::Low, Box::new(move || log.lock().unwrap().push("low")));
        }
        {
            let log = log.clone();
            q.push(Priority::High, Box::new(move || log.lock().unwrap().push("high")));
        }
        assert_eq!(q.len(), 2);
        q.pop().unwrap()();
        q.pop().unwrap()();
        assert_eq!(*log.lock().unwrap(), vec!["high", "low"]);
    }

    #[test]
    fn same_priority_is_fifo() {
        let q = GlobalQueue::new();
        let log: Arc<Mutex<Vec<u8>>> = Arc::default();
        for i in 0..3u8 {
            let log = log.clone();
            q.push(Priority::High, Box::new(move || log.lock().unwrap().push(i)));
        }
        q.pop().unwrap()();
        q.pop().unwrap()();
        q.pop().unwrap()();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn drain_empties_and_returns_everything() {
        let q = GlobalQueue::new();
        q.push(Priority::High, Box::new(|| {}));
        q.push(Priority::High, Box::new(|| {}));
        assert_eq!(q.drain().len(), 2);
        assert_eq!(q.len(), 0);
    }
}
