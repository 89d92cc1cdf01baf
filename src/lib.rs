//! # taskrunner
//!
//! **Taskrunner** is a small cooperative scheduler for deferred work.
//!
//! A task wraps a callable that is polled once per turn until it produces a value, fails, or gives
//! up. Producers hand tasks to a [`TaskRunner`] from any thread and receive a [`TaskFuture`] that
//! settles exactly once: with the value, with the failure, or with the reason the task ended
//! without one.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   make_task(f)          make_task_with_attempts(n, f)        impl Task for MyTask
//!        │                           │                                  │
//!   (TaskFn, TaskFuture)     (RetryingTask, TaskFuture)                 │
//!        └───────────────┬───────────┴──────────────────────────────────┘
//!                        ▼ enqueue (any thread)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  TaskRunner                                                       │
//! │  - TaskQueue (FIFO of Box<dyn Task>, closed flag)                 │
//! │  - Bus (broadcast events)                                         │
//! │  - run_turn(): every queued task runs once; deferred ones requeue │
//! └──────┬──────────────────────────────────────┬─────────────────────┘
//!        │ pumped by the host                   │ or by the drive loop
//!        ▼                                      ▼
//!   loop { runner.run_turn() }           runner.spawn(token)   (CadencePolicy pacing)
//!
//!        publish(Event) ──► Bus ──► listener ──► SubscriberSet ──► Subscribe::on_event
//! ```
//!
//! ### Task verdicts
//! ```text
//! callable returns          task does                        future receives
//! ───────────────────────   ──────────────────────────────   ─────────────────────────────
//! value / Some(v)           leaves the queue                 Ok(v)
//! None (any Option layer)   stays queued (Deferred)          (nothing yet)
//! Err(e) / panic            leaves the queue                 Err(Failed / Panicked)
//! None, attempts used up    leaves the queue                 Err(RetriesExhausted)
//! runner shut down          abandoned                        Err(RunnerShutdown)
//! task dropped              -                                Err(Abandoned)
//! ```
//!
//! A callable may return `Option<T>` for payload types (std scalars, strings, paths, addresses,
//! collections, arrays, tuples, and own types marked with [`impl_payload!`]). Types from other
//! crates are returned as [`Outcome<T>`] instead.
//!
//! ## Features
//! | Area              | Description                                                | Key types / traits                          |
//! |-------------------|------------------------------------------------------------|---------------------------------------------|
//! | **Tasks**         | Deferred callables with inferred result types              | [`Task`], [`TaskFn`], [`RetryingTask`]      |
//! | **Results**       | One-shot promise/future pair                               | [`Promise`], [`TaskFuture`]                 |
//! | **Scheduling**    | Turn-based queue, drive loop, shutdown                     | [`TaskRunner`], [`TurnReport`]              |
//! | **Policies**      | Pacing of the drive loop                                   | [`CadencePolicy`], [`JitterPolicy`]         |
//! | **Subscriber API**| Hook into runtime events                                   | [`Subscribe`], [`Event`], [`EventKind`]     |
//! | **Errors**        | Typed task and runtime errors                              | [`TaskError`], [`RuntimeError`]             |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use taskrunner::{TaskRunner, TaskError, make_named_task, make_task_with_attempts};
//!
//! let runner = TaskRunner::default();
//!
//! let mut polls = 0;
//! let (task, ready) = make_named_task("third-time-lucky", move || {
//!     polls += 1;
//!     (polls == 3).then_some(polls)
//! });
//! runner.enqueue(task).unwrap();
//!
//! let (task, hopeless) = make_task_with_attempts(2, || None::<String>);
//! runner.enqueue(task).unwrap();
//!
//! runner.run_until_idle(None);
//!
//! assert_eq!(ready.wait(), Ok(3));
//! assert_eq!(hopeless.wait(), Err(TaskError::RetriesExhausted { attempts: 2 }));
//! ```

mod core;
mod error;
mod events;
mod policies;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use core::{RunnerBuilder, RunnerConfig, TaskRunner, TurnReport};
pub use error::{RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use policies::{CadencePolicy, JitterPolicy};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{
    Deferrable, IntoOutcome, Outcome, Payload, Promise, RetryingTask, RunResult, Task, TaskBox,
    TaskContext, TaskFn, TaskFuture, make_named_task, make_named_task_with_attempts, make_task,
    make_task_with_attempts, promise,
};

// Optional: `tracing` rendering of runtime events.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
