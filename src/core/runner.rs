//! # TaskRunner: queue of deferred tasks driven turn by turn.
//!
//! [`TaskRunner`] owns a FIFO of type-erased [`Task`]s. Producers [`enqueue`](TaskRunner::enqueue)
//! from any thread; a single consumer calls [`run_turn`](TaskRunner::run_turn) (directly, or via
//! the drive loop started with [`TaskRunner::spawn`]).
//!
//! ## Turn
//! ```text
//! run_turn()
//!   ├─► take_all()                 snapshot of the queue, kept where shutdown can reach it
//!   ├─► for each entry:            locks NOT held
//!   │     ├─ task.run(ctx)
//!   │     │    ├─ Ok        → drop entry             publish TaskCompleted
//!   │     │    └─ Deferred  → collect for requeue    publish TaskDeferred
//!   │     └─ panic          → task.abandon(Panicked) publish TaskFailed
//!   ├─► requeue(deferred)          appended behind tasks enqueued during the turn
//!   └─► publish TurnCompleted
//! ```
//!
//! ## Shutdown
//! ```text
//! shutdown()
//!   ├─► close_and_drain()          queued tasks plus the turn's not-yet-run and deferred ones
//!   ├─► publish ShutdownRequested
//!   ├─► abandon(RunnerShutdown)    each of them, TaskAbandoned
//!   └─► publish RunnerStopped      once the turn in progress (if any) rejected its running task
//! ```
//!
//! ## Rules
//! - Each task present at the start of a turn is invoked **exactly once** in that turn
//! - Tasks enqueued during a turn wait for the next one
//! - Turns are serialized: concurrent `run_turn` callers take turns one after another
//! - A task never leaves the queue with an unsettled promise: it finished, gave up, or was
//!   abandoned with a reason
//! - `Drop` runs `shutdown`

use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, broadcast};
use tokio_util::sync::CancellationToken;

use crate::core::builder::RunnerBuilder;
use crate::core::config::RunnerConfig;
use crate::core::queue::{Entry, TaskQueue};
use crate::error::{RuntimeError, TaskError};
use crate::events::{Bus, Event, EventKind};
use crate::tasks::{RunResult, Task, TaskBox, TaskContext};

/// Summary of one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnReport {
    /// Turn number (1-based, monotonic per runner).
    pub turn: u64,
    /// Tasks invoked in this turn.
    pub attempted: usize,
    /// Tasks that left the queue.
    pub completed: usize,
    /// Tasks sent back to the queue.
    pub deferred: usize,
}

impl TurnReport {
    /// True when at least one task left the queue.
    pub fn made_progress(&self) -> bool {
        self.completed > 0
    }
}

/// Turn in progress and shutdown bookkeeping.
///
/// Lock order: `turn_state` before the queue.
#[derive(Default)]
struct TurnState {
    /// Not yet run in this turn.
    pending: VecDeque<Entry>,
    /// Deferred in this turn, requeued when it ends.
    deferred: Vec<Entry>,
    active: bool,
    /// Shutdown happened during this turn; the turn reports its own rejections when it ends.
    turn_owes_stop: bool,
    /// Parties (shutdown call, turn in progress) that still have tasks to reject.
    stop_parties: u8,
    stop_abandoned: usize,
}

/// Cooperative scheduler for [`Task`]s.
///
/// ### Responsibilities
/// - **Queue**: thread-safe, non-blocking enqueue from many producers
/// - **Turns**: invoke every queued task once, round-robin
/// - **Isolation**: a panicking task is removed; the loop keeps going
/// - **Shutdown**: reject every pending future with [`TaskError::RunnerShutdown`]
/// - **Events**: publish queue and turn events to the bus
pub struct TaskRunner {
    pub(crate) cfg: RunnerConfig,
    pub(crate) bus: Bus,
    queue: TaskQueue,
    /// Serializes consumers.
    consumer: Mutex<()>,
    turns: AtomicU64,
    /// Tasks of the turn in progress, reachable by `shutdown`.
    turn_state: Mutex<TurnState>,
    pub(crate) wake: Notify,
    /// Cancelled once shutdown finished publishing.
    pub(crate) stopped: CancellationToken,
}

impl TaskRunner {
    /// Creates a runner without subscribers. Does not need a tokio runtime.
    pub fn new(cfg: RunnerConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::with_bus(cfg, bus)
    }

    /// Starts a builder (used to attach subscribers).
    pub fn builder(cfg: RunnerConfig) -> RunnerBuilder {
        RunnerBuilder::new(cfg)
    }

    pub(crate) fn with_bus(cfg: RunnerConfig, bus: Bus) -> Self {
        Self {
            cfg,
            bus,
            queue: TaskQueue::default(),
            consumer: Mutex::new(()),
            turns: AtomicU64::new(0),
            turn_state: Mutex::new(TurnState::default()),
            wake: Notify::new(),
            stopped: CancellationToken::new(),
        }
    }

    /// Runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Appends a task to the queue and wakes the drive loop.
    ///
    /// Never blocks on running tasks. After [`shutdown`](Self::shutdown) the task is abandoned
    /// with [`TaskError::RunnerShutdown`] (so its future settles) and
    /// [`RuntimeError::Closed`] is returned.
    pub fn enqueue<T: Task>(&self, task: T) -> Result<(), RuntimeError> {
        self.enqueue_boxed(Box::new(task))
    }

    /// Same as [`enqueue`](Self::enqueue) for an already boxed task.
    pub fn enqueue_boxed(&self, task: TaskBox) -> Result<(), RuntimeError> {
        let name: Arc<str> = Arc::from(task.name());
        match self.queue.push(Entry::new(task)) {
            Ok(len) => {
                self.bus.publish(
                    Event::new(EventKind::TaskEnqueued)
                        .with_task(name)
                        .with_pending(len),
                );
                self.wake.notify_one();
                Ok(())
            }
            Err(mut entry) => {
                self.abandon(&mut entry, TaskError::RunnerShutdown);
                Err(RuntimeError::Closed {
                    task: name.to_string(),
                })
            }
        }
    }

    /// Runs one turn over the tasks queued right now.
    pub fn run_turn(&self) -> TurnReport {
        let _consumer = self.consumer.lock().unwrap_or_else(PoisonError::into_inner);
        let turn = self.turns.fetch_add(1, Ordering::Relaxed) + 1;
        {
            let mut st = self.lock_turn();
            st.pending = self.queue.take_all();
            st.active = true;
        }

        let mut report = TurnReport {
            turn,
            ..TurnReport::default()
        };
        let mut late = Vec::new();

        loop {
            let next = self.lock_turn().pending.pop_front();
            let Some(mut entry) = next else {
                break;
            };
            entry.attempts = entry.attempts.saturating_add(1);
            report.attempted += 1;

            match self.run_once(&mut entry, turn) {
                RunResult::Ok => {
                    report.completed += 1;
                    self.bus.publish(
                        Event::new(EventKind::TaskCompleted)
                            .with_task(entry.task.name())
                            .with_attempt(entry.attempts)
                            .with_turn(turn),
                    );
                }
                RunResult::Deferred => {
                    report.deferred += 1;
                    self.bus.publish(
                        Event::new(EventKind::TaskDeferred)
                            .with_task(entry.task.name())
                            .with_attempt(entry.attempts)
                            .with_turn(turn),
                    );
                    let mut st = self.lock_turn();
                    if self.queue.is_closed() {
                        late.push(entry);
                    } else {
                        st.deferred.push(entry);
                    }
                }
            }
        }

        let (pending, stopping) = {
            let mut st = self.lock_turn();
            let pending = match self.queue.requeue(std::mem::take(&mut st.deferred)) {
                Ok(len) => len,
                Err(rest) => {
                    late.extend(rest);
                    0
                }
            };
            st.active = false;
            (pending, std::mem::take(&mut st.turn_owes_stop))
        };

        let late_count = late.len();
        for mut entry in late {
            self.abandon(&mut entry, TaskError::RunnerShutdown);
        }

        self.bus.publish(
            Event::new(EventKind::TurnCompleted)
                .with_turn(turn)
                .with_invoked(report.attempted)
                .with_pending(pending),
        );
        if stopping {
            self.finish_stop(late_count);
        }
        report
    }

    /// Runs turns until the queue is empty, at most `max_turns` of them (`None` = no bound).
    ///
    /// Returns the number of turns run. Without a bound this never returns while a task keeps
    /// deferring.
    pub fn run_until_idle(&self, max_turns: Option<usize>) -> usize {
        let mut turns = 0;
        while !self.is_empty() && max_turns.is_none_or(|max| turns < max) {
            self.run_turn();
            turns += 1;
        }
        turns
    }

    /// Closes the runner and rejects every queued task with [`TaskError::RunnerShutdown`].
    ///
    /// Called during a turn (from a task or another thread), the tasks of that turn that have not
    /// run yet or already deferred are rejected too; a task running at that moment is rejected by
    /// the turn if it defers. `RunnerStopped` is published once every rejection happened, and
    /// carries the total.
    ///
    /// Returns the number of tasks this call rejected. Idempotent: later calls return 0.
    pub fn shutdown(&self) -> usize {
        let drained = {
            let mut st = self.lock_turn();
            let Some(mut drained) = self.queue.close_and_drain() else {
                return 0;
            };
            drained.extend(st.pending.drain(..));
            drained.append(&mut st.deferred);
            st.turn_owes_stop = st.active;
            st.stop_parties = 1 + u8::from(st.active);
            drained
        };
        self.bus.publish(Event::new(EventKind::ShutdownRequested));

        let count = drained.len();
        for mut entry in drained {
            self.abandon(&mut entry, TaskError::RunnerShutdown);
        }

        self.wake.notify_one();
        self.finish_stop(count);
        count
    }

    /// True after [`shutdown`](Self::shutdown).
    pub fn is_closed(&self) -> bool {
        self.queue.is_closed()
    }

    /// Number of queued tasks (excludes tasks of an in-flight turn).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True if no task is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of queued tasks, in queue order.
    pub fn pending(&self) -> Vec<String> {
        self.queue.names()
    }

    /// Number of turns started so far.
    pub fn turns(&self) -> u64 {
        self.turns.load(Ordering::Relaxed)
    }

    /// Raw receiver of runtime events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Invokes one task, converting a panic escaping `run` into an abandonment.
    fn run_once(&self, entry: &mut Entry, turn: u64) -> RunResult {
        let ctx = TaskContext::new(turn, entry.attempts, &self.bus);
        match panic::catch_unwind(AssertUnwindSafe(|| entry.task.run(&ctx))) {
            Ok(res) => res,
            Err(payload) => {
                let err = TaskError::from_panic(payload);
                ctx.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_task(entry.task.name())
                        .with_reason(err.to_string()),
                );
                let _ = panic::catch_unwind(AssertUnwindSafe(|| entry.task.abandon(err)));
                RunResult::Ok
            }
        }
    }

    fn lock_turn(&self) -> MutexGuard<'_, TurnState> {
        self.turn_state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `abandoned` to the shutdown tally; the last party to finish publishes `RunnerStopped`.
    fn finish_stop(&self, abandoned: usize) {
        let total = {
            let mut st = self.lock_turn();
            st.stop_abandoned += abandoned;
            st.stop_parties = st.stop_parties.saturating_sub(1);
            (st.stop_parties == 0).then_some(st.stop_abandoned)
        };
        if let Some(total) = total {
            self.bus
                .publish(Event::new(EventKind::RunnerStopped).with_pending(total));
            self.stopped.cancel();
        }
    }

    /// Rejects the entry's promise and reports it.
    fn abandon(&self, entry: &mut Entry, err: TaskError) {
        self.bus.publish(
            Event::new(EventKind::TaskAbandoned)
                .with_task(entry.task.name())
                .with_reason(err.as_label()),
        );
        let _ = panic::catch_unwind(AssertUnwindSafe(|| entry.task.abandon(err)));
    }
}

impl Default for TaskRunner {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl Drop for TaskRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}
