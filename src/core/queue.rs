//! # Task queue shared by producers and the drive loop.
//!
//! A mutex-protected `VecDeque` plus a `closed` flag kept under the same lock, so that a push
//! can never slip in after shutdown drained the queue.
//!
//! ## Rules
//! - Only membership changes take the lock; tasks run outside it.
//! - Once closed, `push` and `requeue` hand the entries back to the caller.
//! - Lock poisoning is ignored: the protected state is a plain container.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::tasks::TaskBox;

/// Queued task plus its invocation count.
pub(crate) struct Entry {
    pub task: TaskBox,
    pub attempts: u32,
}

impl Entry {
    pub fn new(task: TaskBox) -> Self {
        Self { task, attempts: 0 }
    }
}

#[derive(Default)]
struct State {
    entries: VecDeque<Entry>,
    closed: bool,
}

/// FIFO of type-erased tasks.
#[derive(Default)]
pub(crate) struct TaskQueue {
    state: Mutex<State>,
}

impl TaskQueue {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends an entry; returns the new length, or the entry back if closed.
    pub fn push(&self, entry: Entry) -> Result<usize, Entry> {
        let mut state = self.lock();
        if state.closed {
            return Err(entry);
        }
        state.entries.push_back(entry);
        Ok(state.entries.len())
    }

    /// Takes every queued entry for one turn, leaving the queue empty.
    pub fn take_all(&self) -> VecDeque<Entry> {
        std::mem::take(&mut self.lock().entries)
    }

    /// Appends deferred entries behind anything enqueued meanwhile.
    ///
    /// Returns the entries back if the queue was closed in the meantime.
    pub fn requeue(&self, deferred: Vec<Entry>) -> Result<usize, Vec<Entry>> {
        let mut state = self.lock();
        if state.closed {
            return Err(deferred);
        }
        state.entries.extend(deferred);
        Ok(state.entries.len())
    }

    /// Closes the queue and returns what was left in it; `None` if it was already closed.
    pub fn close_and_drain(&self) -> Option<Vec<Entry>> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        state.closed = true;
        Some(state.entries.drain(..).collect())
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Task names in queue order.
    pub fn names(&self) -> Vec<String> {
        self.lock()
            .entries
            .iter()
            .map(|e| e.task.name().to_string())
            .collect()
    }
}
