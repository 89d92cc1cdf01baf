//! # Task constructors that pair a task with its future.
//!
//! Each helper builds the right task type for the callable's return type (see
//! [`IntoOutcome`]) and attaches a fresh promise. The task goes to
//! [`TaskRunner::enqueue`](crate::TaskRunner::enqueue); the future stays with the caller.
//!
//! | helper                              | name        | task type           |
//! |-------------------------------------|-------------|---------------------|
//! | [`make_task`]                       | generated   | [`TaskFn`]          |
//! | [`make_named_task`]                 | as given    | [`TaskFn`]          |
//! | [`make_task_with_attempts`]         | generated   | [`RetryingTask`]    |
//! | [`make_named_task_with_attempts`]   | as given    | [`RetryingTask`]    |
//!
//! The `_with_attempts` helpers require a return type that can report "not ready": a callable
//! returning `()` is rejected at compile time.
//!
//! ```compile_fail
//! let _ = taskrunner::make_task_with_attempts(3, || ());
//! ```
//!
//! `Option<T>` works for any [`Payload`](crate::Payload) `T`. A type from another crate is not a
//! payload and cannot be made one; return [`Outcome<T>`](crate::Outcome) for it
//! (`Outcome::Pending` for "not ready").

use std::borrow::Cow;

use crate::tasks::outcome::{Deferrable, IntoOutcome};
use crate::tasks::promise::TaskFuture;
use crate::tasks::retrying::RetryingTask;
use crate::tasks::task_fn::TaskFn;

/// Builds a task with a generated name and returns it with its future.
///
/// ```rust
/// use taskrunner::{make_task, Task, TaskContext};
///
/// let (mut task, fut) = make_task(|| Some(Some(5_u16)));
/// let _ = task.run(&TaskContext::detached());
/// assert_eq!(fut.wait(), Ok(5));
/// ```
pub fn make_task<F, R>(f: F) -> (TaskFn<F, R::Output>, TaskFuture<R::Output>)
where
    F: FnMut() -> R + Send + 'static,
    R: IntoOutcome,
    R::Output: Send + 'static,
{
    let mut task = TaskFn::unnamed(f);
    let fut = task.future();
    (task, fut)
}

/// Builds a task with the given name and returns it with its future.
pub fn make_named_task<F, R>(
    name: impl Into<Cow<'static, str>>,
    f: F,
) -> (TaskFn<F, R::Output>, TaskFuture<R::Output>)
where
    F: FnMut() -> R + Send + 'static,
    R: IntoOutcome,
    R::Output: Send + 'static,
{
    let mut task = TaskFn::new(name, f);
    let fut = task.future();
    (task, fut)
}

/// Builds a bounded-retry task with a generated name and returns it with its future.
pub fn make_task_with_attempts<F, R>(
    attempts: u32,
    f: F,
) -> (RetryingTask<F, R::Output>, TaskFuture<R::Output>)
where
    F: FnMut() -> R + Send + 'static,
    R: Deferrable,
    R::Output: Send + 'static,
{
    let mut task = RetryingTask::unnamed(attempts, f);
    let fut = task.future();
    (task, fut)
}

/// Builds a named bounded-retry task and returns it with its future.
///
/// ```rust
/// use taskrunner::{make_named_task_with_attempts, Task, TaskContext, TaskError};
///
/// let (mut task, fut) = make_named_task_with_attempts("link-up", 1, || None::<bool>);
/// assert_eq!(task.name(), "link-up");
/// let _ = task.run(&TaskContext::detached());
/// assert_eq!(fut.wait(), Err(TaskError::RetriesExhausted { attempts: 1 }));
/// ```
pub fn make_named_task_with_attempts<F, R>(
    name: impl Into<Cow<'static, str>>,
    attempts: u32,
    f: F,
) -> (RetryingTask<F, R::Output>, TaskFuture<R::Output>)
where
    F: FnMut() -> R + Send + 'static,
    R: Deferrable,
    R::Output: Send + 'static,
{
    let mut task = RetryingTask::new(name, attempts, f);
    let fut = task.future();
    (task, fut)
}
