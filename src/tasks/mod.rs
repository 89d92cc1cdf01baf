//! # Task abstractions and constructors.
//!
//! This module provides the task-related types:
//! - [`Task`] - trait the runner drives (`name` + `run` → `Ok`/`Deferred`)
//! - [`TaskFn`] - function-backed task with an optional promise
//! - [`RetryingTask`] - bounded-retry decorator over [`TaskFn`]
//! - [`promise`] - one-shot promise/future pair used to deliver results
//! - factory helpers ([`make_task`] and friends) that infer the result type
//! - [`IntoOutcome`] / [`Payload`] - return-type inference rules

mod factory;
mod outcome;
pub mod promise;
mod retrying;
mod task;
mod task_fn;

pub use factory::{
    make_named_task, make_named_task_with_attempts, make_task, make_task_with_attempts,
};
pub use outcome::{Deferrable, IntoOutcome, Outcome, Payload};
pub use promise::{Promise, TaskFuture};
pub use retrying::RetryingTask;
pub use task::{RunResult, Task, TaskBox, TaskContext};
pub use task_fn::TaskFn;
