//! # Drive loop: runs turns on a dedicated tokio task.
//!
//! Hosts that do not pump [`TaskRunner::run_turn`] themselves start the loop with
//! [`TaskRunner::spawn`] and stop it by cancelling the token.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► closed or token cancelled?        → exit
//!   ├─► queue empty?                      → wait for enqueue (Notify) or cancellation
//!   ├─► run_turn()
//!   ├─► stalled = progress ? 0 : stalled + 1
//!   ├─► queue empty?                      → next iteration (waits for enqueue)
//!   └─► delay = cadence.delay(stalled)    → publish TurnScheduled, sleep (cancellable)
//! }
//! shutdown()                              → pending futures rejected with RunnerShutdown
//! ```
//!
//! ## Rules
//! - Cancellation is honoured between turns, never in the middle of one
//! - The loop always ends with `shutdown()`, so no future is left unresolved
//! - Tasks run on the loop's tokio task; they must not block

use std::sync::Arc;
use std::time::Duration;

use tokio::{select, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;

use crate::core::runner::TaskRunner;
use crate::events::{Event, EventKind};

impl TaskRunner {
    /// Spawns the drive loop on the current tokio runtime.
    ///
    /// # Panics
    /// Panics if called outside of a tokio runtime.
    pub fn spawn(self: &Arc<Self>, token: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(Arc::clone(self).drive(token))
    }

    /// Runs turns until `token` is cancelled or the runner is shut down, then shuts it down.
    pub async fn drive(self: Arc<Self>, token: CancellationToken) {
        let mut stalled: u32 = 0;

        loop {
            if token.is_cancelled() || self.is_closed() {
                break;
            }

            if self.is_empty() {
                select! {
                    _ = self.wake.notified() => continue,
                    _ = token.cancelled() => break,
                }
            }

            let report = self.run_turn();
            stalled = if report.made_progress() {
                0
            } else {
                stalled.saturating_add(1)
            };

            if self.is_empty() {
                continue;
            }

            let delay = self.cfg.cadence.delay(stalled);
            if delay == Duration::ZERO {
                tokio::task::yield_now().await;
                continue;
            }

            self.bus.publish(
                Event::new(EventKind::TurnScheduled)
                    .with_turn(report.turn)
                    .with_delay(delay),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => break,
            }
        }

        self.shutdown();
    }
}
