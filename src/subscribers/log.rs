//! # Logging subscriber that renders runtime events through `tracing`.
//!
//! Enabled with the `logging` feature. Routine queue traffic goes to `debug`/`trace`, task
//! verdicts to `info`, anything that lost a result or an event to `warn`.
//!
//! ## Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use taskrunner::{LogWriter, RunnerConfig, Subscribe, TaskRunner};
//!
//! let runner = TaskRunner::builder(RunnerConfig::default())
//!     .with_subscribers(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])
//!     .build();
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// `tracing` rendering of runner events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::TaskEnqueued => {
                tracing::debug!(seq = e.seq, task, pending = ?e.pending, "task enqueued");
            }
            EventKind::TaskDeferred => {
                tracing::trace!(seq = e.seq, task, attempt = ?e.attempt, turn = ?e.turn, "task deferred");
            }
            EventKind::TaskCompleted => {
                tracing::info!(seq = e.seq, task, attempt = ?e.attempt, turn = ?e.turn, "task completed");
            }
            EventKind::TaskFailed => {
                tracing::info!(seq = e.seq, task, reason, attempt = ?e.attempt, "task failed");
            }
            EventKind::FailureUnobserved => {
                tracing::warn!(seq = e.seq, task, reason, "task failed with nobody waiting for it");
            }
            EventKind::RetriesExhausted => {
                tracing::warn!(seq = e.seq, task, attempt = ?e.attempt, "task gave up");
            }
            EventKind::TaskAbandoned => {
                tracing::warn!(seq = e.seq, task, reason, "task abandoned");
            }
            EventKind::TurnCompleted => {
                tracing::trace!(seq = e.seq, turn = ?e.turn, invoked = ?e.invoked, pending = ?e.pending, "turn completed");
            }
            EventKind::TurnScheduled => {
                tracing::trace!(seq = e.seq, turn = ?e.turn, delay_ms = ?e.delay_ms, "next turn scheduled");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "shutdown requested");
            }
            EventKind::RunnerStopped => {
                tracing::info!(seq = e.seq, abandoned = ?e.pending, "runner stopped");
            }
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                tracing::warn!(seq = e.seq, subscriber = task, reason, kind = ?e.kind, "subscriber trouble");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
