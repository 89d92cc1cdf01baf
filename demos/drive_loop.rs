//! # Example: drive_loop
//!
//! The runner drives itself on a tokio task while producers enqueue work and await the futures.
//!
//! Demonstrates how to:
//! - Attach a subscriber with [`TaskRunner::builder`].
//! - Pace turns with [`CadencePolicy::Stretch`].
//! - Start the loop with [`TaskRunner::spawn`] and stop it with a [`CancellationToken`].
//!
//! ## Flow
//! ```text
//! builder(cfg).with_subscribers([Printer]).build()
//! spawn(token) ──► loop { wait for work ─► run_turn ─► pause (stretches while stalled) }
//! producers    ──► enqueue(warmup-N) ─► fut.await
//! token.cancel() ─► shutdown() ─► pending futures: Err(RunnerShutdown)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example drive_loop
//! ```

use std::sync::Arc;
use std::time::Duration;

use taskrunner::{
    CadencePolicy, Event, EventKind, JitterPolicy, RunnerConfig, Subscribe, TaskRunner,
    make_named_task,
};
use tokio_util::sync::CancellationToken;

struct Printer;

#[async_trait::async_trait]
impl Subscribe for Printer {
    async fn on_event(&self, ev: &Event) {
        match ev.kind {
            EventKind::TaskCompleted | EventKind::TaskAbandoned | EventKind::RunnerStopped => {
                println!("[event] {:?} task={:?} turn={:?}", ev.kind, ev.task, ev.turn);
            }
            _ => {}
        }
    }

    fn name(&self) -> &'static str {
        "printer"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Pause 20ms after a productive turn, up to 200ms while nothing finishes.
    let cfg = RunnerConfig::default().with_cadence(CadencePolicy::Stretch {
        first: Duration::from_millis(20),
        max: Duration::from_millis(200),
        factor: 2.0,
        jitter: JitterPolicy::Equal,
    });

    // 2. Runner with a subscriber, and its drive loop.
    let runner = TaskRunner::builder(cfg)
        .with_subscribers(vec![Arc::new(Printer) as Arc<dyn Subscribe>])
        .build();
    let token = CancellationToken::new();
    let handle = runner.spawn(token.clone());

    // 3. Tasks that become ready after a different number of polls.
    let mut futures = Vec::new();
    for n in 1..=3_u32 {
        let mut polls = 0;
        let (task, fut) = make_named_task(format!("warmup-{n}"), move || {
            polls += 1;
            (polls == n * 2).then_some(polls)
        });
        runner.enqueue(task)?;
        futures.push(fut);
    }

    // 4. One that never finishes; cancellation rejects it.
    let (stuck, stuck_fut) = make_named_task("stuck", || None::<u8>);
    runner.enqueue(stuck)?;

    for fut in futures {
        println!("[main] warmup finished after {} polls", fut.await?);
    }

    // 5. Stop the loop; the remaining task is rejected.
    token.cancel();
    handle.await?;
    println!("[main] stuck -> {:?}", stuck_fut.await);

    // Give the subscriber a moment to print the last events.
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
