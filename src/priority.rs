//! Static task priority.

/// The three static priority levels a task may be submitted with.
///
/// Ordering matches urgency: `High > Medium > Low`. Only `High` tasks are
/// routed to the pool's global priority heap; `Medium` and `Low` share the
/// per-worker local deques and carry no further distinction between each
/// other once there (see the crate's top-level docs for the full routing
/// rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Routed to a per-worker local deque, same as `Medium`.
    Low,
    /// The default priority for [`crate::ThreadPool::submit`].
    Medium,
    /// Routed to the pool's global heap; picked up ahead of any `Medium`/`Low`
    /// task a worker hasn't already started.
    High,
}

impl Default for Priority {
    #[inline]
    fn default() -> Self {
        Priority::Medium
    }
}
