//! # Bounded-retry decorator (`RetryingTask`)
//!
//! [`RetryingTask`] wraps a [`TaskFn`] and limits how many times it may report
//! [`RunResult::Deferred`]. Each deferred invocation consumes one attempt; when none remain the
//! promise is rejected with [`TaskError::RetriesExhausted`] and the task reports `Ok`, so the
//! runner drops it instead of requeueing it.
//!
//! ```text
//! run() ─► inner.run()
//!            ├─ Ok        → Ok                  (attempts untouched)
//!            └─ Deferred  → remaining -= 1
//!                             ├─ remaining > 0 → Deferred
//!                             └─ remaining = 0 → reject(RetriesExhausted) → Ok
//! ```
//!
//! A count of `0` behaves like `1`: the first deferred result is also the last. The requested
//! count is what [`RetryingTask::attempts`] and the rejection report.

use std::borrow::Cow;

use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::tasks::outcome::Deferrable;
use crate::tasks::promise::{Promise, TaskFuture};
use crate::tasks::task::{RunResult, Task, TaskContext};
use crate::tasks::task_fn::TaskFn;

/// Task that gives up after a fixed number of not-ready results.
pub struct RetryingTask<F, T> {
    inner: TaskFn<F, T>,
    attempts: u32,
    remaining: u32,
}

impl<F, R, T> RetryingTask<F, T>
where
    F: FnMut() -> R + Send + 'static,
    R: Deferrable<Output = T>,
    T: Send + 'static,
{
    /// Creates a named task allowed to defer `attempts` times.
    pub fn new(name: impl Into<Cow<'static, str>>, attempts: u32, f: F) -> Self {
        Self::wrap(TaskFn::new(name, f), attempts)
    }

    /// Creates a task with a generated name allowed to defer `attempts` times.
    pub fn unnamed(attempts: u32, f: F) -> Self {
        Self::wrap(TaskFn::unnamed(f), attempts)
    }

    fn wrap(inner: TaskFn<F, T>, attempts: u32) -> Self {
        Self {
            inner,
            attempts,
            remaining: attempts.max(1),
        }
    }

    /// Attaches the promise settled when the task finishes or gives up.
    pub fn set_promise(&mut self, promise: Promise<T>) {
        self.inner.set_promise(promise);
    }

    /// Creates a fresh channel, attaches its promise and returns the future.
    pub fn future(&mut self) -> TaskFuture<T> {
        self.inner.future()
    }

    /// Attempt budget as requested (`0` is kept, though it behaves like `1`).
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Deferred results still allowed before giving up.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl<F, R, T> Task for RetryingTask<F, T>
where
    F: FnMut() -> R + Send + 'static,
    R: Deferrable<Output = T>,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn run(&mut self, ctx: &TaskContext<'_>) -> RunResult {
        if self.remaining == 0 {
            return RunResult::Ok;
        }

        match self.inner.run(ctx) {
            RunResult::Ok => RunResult::Ok,
            RunResult::Deferred => {
                self.remaining -= 1;
                if self.remaining > 0 {
                    return RunResult::Deferred;
                }

                ctx.publish(
                    Event::new(EventKind::RetriesExhausted)
                        .with_task(self.inner.name())
                        .with_reason(format!("attempts={}", self.attempts)),
                );
                if let Some(promise) = self.inner.take_promise() {
                    promise.reject(TaskError::RetriesExhausted {
                        attempts: self.attempts,
                    });
                }
                RunResult::Ok
            }
        }
    }

    fn abandon(&mut self, error: TaskError) {
        self.inner.abandon(error);
    }
}
