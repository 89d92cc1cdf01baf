//! Error types used by the runner and by tasks.
//!
//! This module defines two enums:
//!
//! - [`TaskError`]: the reason a producer's [`TaskFuture`](crate::TaskFuture) was rejected.
//! - [`RuntimeError`]: errors returned by the [`TaskRunner`](crate::TaskRunner) API itself.
//!
//! Both provide `as_label` / `as_message` helpers for logs and metrics.

use std::any::Any;

use thiserror::Error;

/// # Errors delivered through a task's future.
///
/// `Failed` and `Panicked` carry a failure of the wrapped computation. The remaining variants
/// mean the task ended without producing anything (see [`TaskError::is_abandonment`]).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The computation returned an error.
    #[error("execution failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// The computation panicked.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// A bounded-retry task ran out of attempts without ever becoming ready.
    #[error("retries exhausted after {attempts} attempt(s)")]
    RetriesExhausted {
        /// Configured number of attempts.
        attempts: u32,
    },

    /// The runner shut down while the task was still queued.
    #[error("task runner shut down")]
    RunnerShutdown,

    /// The promise was dropped without being settled (broken promise).
    #[error("task abandoned")]
    Abandoned,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskrunner::TaskError;
    ///
    /// let err = TaskError::RetriesExhausted { attempts: 3 };
    /// assert_eq!(err.as_label(), "task_retries_exhausted");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Failed { .. } => "task_failed",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::RetriesExhausted { .. } => "task_retries_exhausted",
            TaskError::RunnerShutdown => "task_runner_shutdown",
            TaskError::Abandoned => "task_abandoned",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Failed { error } => format!("error: {error}"),
            TaskError::Panicked { message } => format!("panic: {message}"),
            TaskError::RetriesExhausted { attempts } => format!("gave up after {attempts} attempt(s)"),
            TaskError::RunnerShutdown => "runner shut down".to_string(),
            TaskError::Abandoned => "promise dropped".to_string(),
        }
    }

    /// Indicates that the task ended without a result rather than failing.
    ///
    /// Returns `true` for [`TaskError::RetriesExhausted`], [`TaskError::RunnerShutdown`] and
    /// [`TaskError::Abandoned`].
    ///
    /// # Example
    /// ```
    /// use taskrunner::TaskError;
    ///
    /// assert!(TaskError::RunnerShutdown.is_abandonment());
    /// assert!(!TaskError::Failed { error: "boom".into() }.is_abandonment());
    /// ```
    pub fn is_abandonment(&self) -> bool {
        matches!(
            self,
            TaskError::RetriesExhausted { .. } | TaskError::RunnerShutdown | TaskError::Abandoned
        )
    }

    /// Builds a [`TaskError::Panicked`] from a `catch_unwind` payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        TaskError::Panicked { message }
    }
}

/// # Errors produced by the runner API.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    /// The runner was already shut down; the task was abandoned instead of queued.
    #[error("runner is closed; task '{task}' was not queued")]
    Closed {
        /// Name of the refused task.
        task: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskrunner::RuntimeError;
    ///
    /// let err = RuntimeError::Closed { task: "probe".into() };
    /// assert_eq!(err.as_label(), "runtime_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Closed { .. } => "runtime_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Closed { task } => format!("enqueue after shutdown; task={task}"),
        }
    }
}
