//! # Runtime events emitted by the runner and by tasks.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Queue events**: a task entered, was deferred in, or left the queue
//! - **Outcome events**: failures and early terminations (exhausted retries, shutdown)
//! - **Runner events**: turn boundaries, shutdown, subscriber health
//!
//! The [`Event`] struct carries additional metadata such as timestamps, task name,
//! reasons and turn numbers.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskrunner::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskDeferred)
//!     .with_task("probe-gpu")
//!     .with_attempt(3)
//!     .with_turn(7);
//!
//! assert_eq!(ev.kind, EventKind::TaskDeferred);
//! assert_eq!(ev.task.as_deref(), Some("probe-gpu"));
//! assert_eq!(ev.turn, Some(7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `task`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Queue events ===
    /// Task was appended to the queue.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `pending`: queue length after the append
    TaskEnqueued,

    /// Task reported not-ready and went back to the end of the queue.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: invocations so far (1-based)
    /// - `turn`: turn number
    TaskDeferred,

    /// Task reported `Ok` and left the queue. Its promise, if any, is already settled.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: invocations so far (1-based)
    /// - `turn`: turn number
    TaskCompleted,

    // === Outcome events ===
    /// The computation failed and the failure was delivered to the attached promise.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    /// - `attempt`, `turn`
    TaskFailed,

    /// The computation failed but no promise was attached, so nobody receives the failure.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: failure message
    /// - `attempt`, `turn`
    FailureUnobserved,

    /// A bounded-retry task ran out of attempts.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `attempt`: configured attempt count
    /// - `turn`
    RetriesExhausted,

    /// Task was dropped from the queue by shutdown; its promise was rejected.
    ///
    /// Sets:
    /// - `task`: task name
    /// - `reason`: rejection label
    TaskAbandoned,

    // === Runner events ===
    /// A full pass over the queue finished.
    ///
    /// Sets:
    /// - `turn`: turn number
    /// - `invoked`: number of tasks invoked in this turn
    /// - `pending`: queue length after the turn
    TurnCompleted,

    /// Drive loop is pausing before the next turn.
    ///
    /// Sets:
    /// - `turn`: last finished turn
    /// - `delay_ms`: pause length
    TurnScheduled,

    /// Shutdown started.
    ShutdownRequested,

    /// Shutdown finished.
    ///
    /// Sets:
    /// - `pending`: number of tasks abandoned by the shutdown
    RunnerStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Attempt count (starting from 1).
    pub attempt: Option<u32>,
    /// Turn number (starting from 1).
    pub turn: Option<u64>,
    /// Queue length or abandoned count, depending on the kind.
    pub pending: Option<u32>,
    /// Tasks invoked during a turn.
    pub invoked: Option<u32>,
    /// Pause before the next turn in milliseconds (compact).
    pub delay_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            reason: None,
            attempt: None,
            turn: None,
            pending: None,
            invoked: None,
            delay_ms: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an attempt count.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a turn number.
    #[inline]
    pub fn with_turn(mut self, turn: u64) -> Self {
        self.turn = Some(turn);
        self
    }

    /// Attaches a queue length / count (saturates at `u32::MAX`).
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches the number of tasks a turn invoked (saturates at `u32::MAX`).
    #[inline]
    pub fn with_invoked(mut self, n: usize) -> Self {
        self.invoked = Some(u32::try_from(n).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a pause duration (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    /// True for [`EventKind::SubscriberOverflow`].
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for kinds that tell a producer-visible task ended without a value.
    #[inline]
    pub fn is_abandonment(&self) -> bool {
        matches!(
            self.kind,
            EventKind::RetriesExhausted | EventKind::TaskAbandoned
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TaskEnqueued);
        let b = Event::new(EventKind::TaskEnqueued);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_pending_saturates() {
        let ev = Event::new(EventKind::TurnCompleted).with_pending(usize::MAX);
        assert_eq!(ev.pending, Some(u32::MAX));
    }

    #[test]
    fn test_abandonment_kinds() {
        assert!(Event::new(EventKind::TaskAbandoned).is_abandonment());
        assert!(Event::new(EventKind::RetriesExhausted).is_abandonment());
        assert!(!Event::new(EventKind::TaskFailed).is_abandonment());
        assert!(!Event::new(EventKind::TaskCompleted).is_abandonment());
    }

    #[test]
    fn test_invoked_is_separate_from_attempt() {
        let ev = Event::new(EventKind::TurnCompleted).with_invoked(3);
        assert_eq!(ev.invoked, Some(3));
        assert_eq!(ev.attempt, None);
    }

    #[test]
    fn test_delay_stored_in_millis() {
        let ev = Event::new(EventKind::TurnScheduled).with_delay(Duration::from_millis(1500));
        assert_eq!(ev.delay_ms, Some(1500));
    }
}
