//! # Example: pumped_runner
//!
//! The host drives the runner itself, one turn per loop iteration, without any async runtime.
//!
//! Demonstrates how to:
//! - Build tasks with [`make_named_task`] and [`make_named_task_with_attempts`].
//! - Call [`TaskRunner::run_turn`] from a plain loop.
//! - Collect results from the futures with `wait()`.
//!
//! ## Flow
//! ```text
//! enqueue(sensor, flaky, doomed)
//! loop {
//!   run_turn()
//!     ├─► sensor  → Deferred until the 3rd poll, then Ok(21.5)
//!     ├─► flaky   → Err on the 2nd poll → Failed
//!     └─► doomed  → Deferred 4 times    → RetriesExhausted
//! } until the queue is empty
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example pumped_runner
//! ```

use taskrunner::{TaskRunner, make_named_task, make_named_task_with_attempts};

fn main() {
    // 1. Default configuration; no runtime is needed when the host pumps turns.
    let runner = TaskRunner::default();

    // 2. A reading that becomes available on the third poll.
    let mut polls = 0;
    let (sensor, sensor_fut) = make_named_task("sensor", move || {
        polls += 1;
        (polls >= 3).then_some(21.5_f32)
    });

    // 3. A computation that fails outright.
    let mut tries = 0;
    let (flaky, flaky_fut) = make_named_task("flaky", move || {
        tries += 1;
        if tries == 2 {
            Err("checksum mismatch")
        } else {
            Ok(None::<u32>)
        }
    });

    // 4. A task that never gets ready and gives up after 4 deferrals.
    let (doomed, doomed_fut) = make_named_task_with_attempts("doomed", 4, || None::<String>);

    for res in [runner.enqueue(sensor), runner.enqueue(flaky), runner.enqueue(doomed)] {
        if let Err(e) = res {
            eprintln!("enqueue failed: {e}");
            return;
        }
    }

    // 5. Pump turns until everything settled.
    while !runner.is_empty() {
        let report = runner.run_turn();
        println!(
            "[turn {}] attempted={} completed={} deferred={}",
            report.turn, report.attempted, report.completed, report.deferred
        );
    }

    println!("sensor -> {:?}", sensor_fut.wait());
    println!("flaky  -> {:?}", flaky_fut.wait());
    println!("doomed -> {:?}", doomed_fut.wait());
}
