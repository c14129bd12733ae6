//! The caller-owned half of a task's completion channel.

use std::sync::mpsc::{Receiver, TryRecvError};

use crate::error::JoinError;

/// A handle to a task submitted to a [`crate::ThreadPool`].
///
/// Exactly one of these is returned per submission. It is satisfied exactly
/// once: either with the value `f` returned, or with a [`JoinError`]
/// describing why it didn't (it panicked, or the pool discarded it during
/// [`crate::ThreadPool::shutdown_immediate`]).
///
/// This is deliberately built on `std::sync::mpsc`'s rendezvous channel
/// rather than a hand-rolled future: the standard library already ships
/// exactly the single-slot, block-or-poll channel this needs, and the
/// result carrier is an implementation detail the scheduler itself
/// shouldn't have to own.
#[must_use = "a TaskHandle does nothing unless you call `.join()` or `.try_join()` on it"]
pub struct TaskHandle<T> {
    rx: Receiver<std::thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(rx: Receiver<std::thread::Result<T>>) -> Self {
        Self { rx }
    }

    /// Blocks until the task finishes, returning its value or the reason it
    /// didn't produce one.
    pub fn join(self) -> Result<T, JoinError> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(JoinError::Panicked(payload)),
            // The sending half was dropped without sending: the envelope
            // was discarded by `shutdown_immediate` before it ran.
            Err(_disconnected) => Err(JoinError::Cancelled),
        }
    }

    /// Returns the task's outcome if it has already finished, without
    /// blocking. Returns `None` if the task is still pending.
    ///
    /// A single `Some` is ever returned for a given handle: once consumed,
    /// later calls observe a disconnected channel and would themselves
    /// return `Some(Err(JoinError::Cancelled))`, so callers should treat a
    /// `Some` result as final and stop polling.
    pub fn try_join(&self) -> Option<Result<T, JoinError>> {
        match self.rx.try_recv() {
            Ok(Ok(value)) => Some(Ok(value)),
            Ok(Err(payload)) => Some(Err(JoinError::Panicked(payload))),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(JoinError::Cancelled)),
        }
    }
}
