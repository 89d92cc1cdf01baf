//! # Function-backed task (`TaskFn`)
//!
//! [`TaskFn`] wraps a callable `F: FnMut() -> R` and an optional [`Promise`]. Each
//! [`run`](Task::run) invokes the callable exactly once and classifies the return value through
//! [`IntoOutcome`]:
//!
//! ```text
//! Pending   → Deferred                                   (promise untouched)
//! Ready(v)  → promise.resolve(v)               → Ok
//! Failed(e) → promise.reject(e)                → Ok      (TaskFailed event)
//!           → no promise: FailureUnobserved event → Ok
//! panic     → handled like Failed(Panicked)
//! ```
//!
//! ## Example
//! ```rust
//! use taskrunner::{RunResult, Task, TaskContext, TaskFn};
//!
//! let mut polls = 0;
//! let mut task = TaskFn::new("warmup", move || {
//!     polls += 1;
//!     (polls == 2).then_some(polls)
//! });
//! let mut fut = task.future();
//!
//! assert_eq!(task.run(&TaskContext::detached()), RunResult::Deferred);
//! assert_eq!(task.run(&TaskContext::detached()), RunResult::Ok);
//! assert_eq!(fut.try_take(), Some(Ok(2)));
//! ```

use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::TaskError;
use crate::events::{Event, EventKind};
use crate::tasks::outcome::{IntoOutcome, Outcome};
use crate::tasks::promise::{self, Promise, TaskFuture};
use crate::tasks::task::{RunResult, Task, TaskContext};

/// Counter behind generated task names.
static UNNAMED_SEQ: AtomicU64 = AtomicU64::new(1);

fn generated_name() -> Cow<'static, str> {
    Cow::Owned(format!(
        "unnamed-task-{}",
        UNNAMED_SEQ.fetch_add(1, Ordering::Relaxed)
    ))
}

/// Function-backed task producing a `T`.
pub struct TaskFn<F, T> {
    name: Cow<'static, str>,
    f: F,
    promise: Option<Promise<T>>,
}

impl<F, R, T> TaskFn<F, T>
where
    F: FnMut() -> R + Send + 'static,
    R: IntoOutcome<Output = T>,
    T: Send + 'static,
{
    /// Creates a task with a declared name. An empty name is replaced by a generated one.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        let name = name.into();
        Self {
            name: if name.is_empty() { generated_name() } else { name },
            f,
            promise: None,
        }
    }

    /// Creates a task with a generated name (`unnamed-task-<n>`), unique within the process.
    pub fn unnamed(f: F) -> Self {
        Self {
            name: generated_name(),
            f,
            promise: None,
        }
    }

    /// Attaches the promise settled when the task finishes.
    ///
    /// Replaces (and thereby breaks) a previously attached promise. Only invocations made after
    /// this call report into the new promise.
    pub fn set_promise(&mut self, promise: Promise<T>) {
        self.promise = Some(promise);
    }

    /// Creates a fresh channel, attaches its promise and returns the future.
    pub fn future(&mut self) -> TaskFuture<T> {
        let (promise, fut) = promise::channel();
        self.set_promise(promise);
        fut
    }

    /// True while a promise is attached and not yet settled.
    pub fn has_promise(&self) -> bool {
        self.promise.is_some()
    }

    /// Detaches the promise without settling it.
    pub(crate) fn take_promise(&mut self) -> Option<Promise<T>> {
        self.promise.take()
    }

    /// Invokes the callable once, converting a panic into a failure.
    fn attempt(&mut self) -> Outcome<T> {
        let f = &mut self.f;
        match panic::catch_unwind(AssertUnwindSafe(|| f().into_outcome())) {
            Ok(outcome) => outcome,
            Err(payload) => Outcome::Failed(TaskError::from_panic(payload)),
        }
    }
}

impl<F, R, T> Task for TaskFn<F, T>
where
    F: FnMut() -> R + Send + 'static,
    R: IntoOutcome<Output = T>,
    T: Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, ctx: &TaskContext<'_>) -> RunResult {
        match self.attempt() {
            Outcome::Pending => RunResult::Deferred,
            Outcome::Ready(value) => {
                if let Some(promise) = self.promise.take() {
                    promise.resolve(value);
                }
                RunResult::Ok
            }
            Outcome::Failed(err) => {
                match self.promise.take() {
                    Some(promise) => {
                        ctx.publish(
                            Event::new(EventKind::TaskFailed)
                                .with_task(self.name.as_ref())
                                .with_reason(err.to_string()),
                        );
                        promise.reject(err);
                    }
                    None => ctx.publish(
                        Event::new(EventKind::FailureUnobserved)
                            .with_task(self.name.as_ref())
                            .with_reason(err.to_string()),
                    ),
                }
                RunResult::Ok
            }
        }
    }

    fn abandon(&mut self, error: TaskError) {
        if let Some(promise) = self.promise.take() {
            promise.reject(error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;

    fn detached() -> TaskContext<'static> {
        TaskContext::detached()
    }

    #[test]
    fn test_declared_name_is_verbatim() {
        let task = TaskFn::new("collect-fields", || ());
        assert_eq!(task.name(), "collect-fields");
    }

    #[test]
    fn test_generated_name_is_stable_and_unique() {
        let a = TaskFn::unnamed(|| ());
        let b = TaskFn::unnamed(|| ());
        assert!(!a.name().is_empty());
        assert_eq!(a.name(), a.name());
        assert_ne!(a.name(), b.name());

        let name = a.name().to_string();
        let moved = Box::new(a);
        assert_eq!(moved.name(), name);
    }

    #[test]
    fn test_empty_name_gets_generated() {
        let task = TaskFn::new("", || ());
        assert!(task.name().starts_with("unnamed-task-"));
    }

    #[test]
    fn test_void_task_resolves_immediately() {
        let mut task = TaskFn::new("void", || ());
        let fut = task.future();
        assert_eq!(task.run(&detached()), RunResult::Ok);
        assert_eq!(fut.wait(), Ok(()));
    }

    #[test]
    fn test_pending_keeps_promise() {
        let mut task = TaskFn::new("never", || None::<u8>);
        let mut fut = task.future();
        for _ in 0..3 {
            assert_eq!(task.run(&detached()), RunResult::Deferred);
        }
        assert!(task.has_promise());
        assert_eq!(fut.try_take(), None);
    }

    #[test]
    fn test_error_rejects_promise() {
        let mut task = TaskFn::new("broken", || Err::<Option<u8>, _>("sensor offline"));
        let fut = task.future();
        assert_eq!(task.run(&detached()), RunResult::Ok);
        assert_eq!(
            fut.wait(),
            Err(TaskError::Failed {
                error: "sensor offline".into()
            })
        );
    }

    #[test]
    fn test_panic_rejects_promise() {
        let mut task = TaskFn::new("panics", || -> Option<u8> { panic!("boom") });
        let fut = task.future();
        assert_eq!(task.run(&detached()), RunResult::Ok);
        assert_eq!(
            fut.wait(),
            Err(TaskError::Panicked {
                message: "boom".into()
            })
        );
    }

    #[test]
    fn test_result_without_promise_has_same_verdicts() {
        let mut calls = 0;
        let mut task = TaskFn::new("fire-and-forget", move || {
            calls += 1;
            (calls > 1).then_some(calls)
        });
        assert_eq!(task.run(&detached()), RunResult::Deferred);
        assert_eq!(task.run(&detached()), RunResult::Ok);
    }

    #[test]
    fn test_unobserved_failure_is_published() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let mut task = TaskFn::new("silent", || Err::<(), _>("lost"));

        assert_eq!(task.run(&TaskContext::new(3, 1, &bus)), RunResult::Ok);

        let ev = rx.try_recv().expect("event");
        assert_eq!(ev.kind, EventKind::FailureUnobserved);
        assert_eq!(ev.task.as_deref(), Some("silent"));
        assert_eq!(ev.turn, Some(3));
        assert_eq!(ev.reason.as_deref(), Some("execution failed: lost"));
    }

    #[test]
    fn test_set_promise_breaks_previous() {
        let mut task = TaskFn::new("swap", || Some(1_u8));
        let first = task.future();
        let second = task.future();
        assert_eq!(first.wait(), Err(TaskError::Abandoned));

        assert_eq!(task.run(&detached()), RunResult::Ok);
        assert_eq!(second.wait(), Ok(1));
    }

    #[test]
    fn test_abandon_rejects_with_reason() {
        let mut task = TaskFn::new("queued", || None::<u8>);
        let fut = task.future();
        task.abandon(TaskError::RunnerShutdown);
        assert_eq!(fut.wait(), Err(TaskError::RunnerShutdown));
    }
}
