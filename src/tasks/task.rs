//! # Task abstraction.
//!
//! This module defines the [`Task`] trait: a named unit of work that the runner invokes once per
//! turn until it reports [`RunResult::Ok`]. The queue stores tasks type-erased as [`TaskBox`], so
//! tasks with different result types share one queue.
//!
//! A task never hands its result back through `run`; it settles its own promise instead.
//! `run` receives a [`TaskContext`] describing the current invocation.

use crate::error::TaskError;
use crate::events::{Bus, Event};

/// Verdict of one [`Task::run`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum RunResult {
    /// The task finished its work (successfully, by failing, or by giving up).
    Ok,
    /// The task is not ready; put it back in the queue and call it again later.
    Deferred,
}

/// # Cooperative unit of deferred work.
///
/// Implementations should do bounded, non-blocking work in [`run`](Task::run) and return
/// [`RunResult::Deferred`] instead of waiting.
///
/// # Example
/// ```
/// use taskrunner::{RunResult, Task, TaskContext};
///
/// struct Countdown(u32);
///
/// impl Task for Countdown {
///     fn name(&self) -> &str { "countdown" }
///
///     fn run(&mut self, _ctx: &TaskContext<'_>) -> RunResult {
///         if self.0 == 0 {
///             return RunResult::Ok;
///         }
///         self.0 -= 1;
///         RunResult::Deferred
///     }
/// }
///
/// let mut task = Countdown(1);
/// assert_eq!(task.run(&TaskContext::detached()), RunResult::Deferred);
/// assert_eq!(task.run(&TaskContext::detached()), RunResult::Ok);
/// ```
pub trait Task: Send + 'static {
    /// Returns a stable, human-readable task name. Never empty.
    fn name(&self) -> &str;

    /// Performs one attempt of the task's work.
    ///
    /// Must not panic or block for long; failures are reported through the task's promise.
    fn run(&mut self, ctx: &TaskContext<'_>) -> RunResult;

    /// Called by the runner when the task leaves the queue without finishing
    /// (shutdown, or a panic escaping `run`). Tasks holding a promise reject it with `error`.
    fn abandon(&mut self, error: TaskError) {
        let _ = error;
    }
}

/// Owning, type-erased task handle stored in the runner's queue.
pub type TaskBox = Box<dyn Task>;

impl<T: Task + ?Sized> Task for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&mut self, ctx: &TaskContext<'_>) -> RunResult {
        (**self).run(ctx)
    }

    fn abandon(&mut self, error: TaskError) {
        (**self).abandon(error)
    }
}

/// Per-invocation context passed to [`Task::run`].
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
    turn: u64,
    attempt: u32,
    bus: Option<&'a Bus>,
}

impl TaskContext<'static> {
    /// Context for running a task by hand, outside of any runner. Events are discarded.
    pub fn detached() -> Self {
        Self {
            turn: 0,
            attempt: 0,
            bus: None,
        }
    }
}

impl<'a> TaskContext<'a> {
    pub(crate) fn new(turn: u64, attempt: u32, bus: &'a Bus) -> Self {
        Self {
            turn,
            attempt,
            bus: Some(bus),
        }
    }

    /// Turn number of the current invocation (`0` when detached).
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// How many times this task has been invoked, including this call (`0` when detached).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Publishes an event on the runner's bus, stamped with the current turn and attempt.
    pub fn publish(&self, ev: Event) {
        if let Some(bus) = self.bus {
            let ev = if self.turn > 0 {
                ev.with_turn(self.turn).with_attempt(self.attempt)
            } else {
                ev
            };
            bus.publish(ev);
        }
    }
}
