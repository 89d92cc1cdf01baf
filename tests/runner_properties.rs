use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use taskrunner::{
    Outcome, RunResult, Task, TaskBox, TaskContext, TaskError, TaskFn, TaskRunner, make_named_task,
    make_named_task_with_attempts, make_task, make_task_with_attempts,
};

fn ready_on_call(n: u32) -> impl FnMut() -> Option<u32> + Send + 'static {
    let mut calls = 0;
    move || {
        calls += 1;
        (calls == n).then_some(calls)
    }
}

#[test]
fn retry_succeeds_on_the_last_allowed_attempt() {
    for n in 1..=6 {
        let runner = TaskRunner::default();
        let (task, fut) = make_named_task_with_attempts("flaky", n, ready_on_call(n));
        runner.enqueue(task).unwrap();

        for turn in 1..n {
            let report = runner.run_turn();
            assert_eq!(report.deferred, 1, "n={n} turn={turn}");
            assert_eq!(runner.len(), 1);
        }
        let report = runner.run_turn();
        assert_eq!(report.completed, 1);
        assert!(runner.is_empty());
        assert_eq!(fut.wait(), Ok(n));
    }
}

#[test]
fn retry_gives_up_after_exactly_n_deferrals() {
    for n in 1..=6 {
        let runner = TaskRunner::default();
        let calls = Arc::new(AtomicU32::new(0));
        let seen = Arc::clone(&calls);
        let (task, fut) = make_task_with_attempts(n, move || {
            seen.fetch_add(1, Ordering::SeqCst);
            None::<String>
        });
        runner.enqueue(task).unwrap();

        assert_eq!(runner.run_until_idle(Some(100)), n as usize);
        assert!(runner.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), n);
        assert_eq!(fut.wait(), Err(TaskError::RetriesExhausted { attempts: n }));
    }
}

#[test]
fn missing_promise_does_not_change_verdicts() {
    let script = [None, None, Some(7_u8)];

    let mut with_promise = TaskFn::new("observed", {
        let mut it = script.into_iter();
        move || it.next().flatten()
    });
    let _fut = with_promise.future();
    let mut without_promise = TaskFn::new("unobserved", {
        let mut it = script.into_iter();
        move || it.next().flatten()
    });

    let ctx = TaskContext::detached();
    for _ in 0..script.len() {
        assert_eq!(with_promise.run(&ctx), without_promise.run(&ctx));
    }

    let mut failing = TaskFn::new("failing", || Err::<Option<u8>, _>("boom"));
    assert!(!failing.has_promise());
    assert_eq!(failing.run(&ctx), RunResult::Ok);
}

#[test]
fn one_turn_finishes_every_ready_task() {
    let runner = TaskRunner::default();
    let mut futures = Vec::new();
    for i in (0..32_u32).rev() {
        let (task, fut) = make_task(move || Some(i * 2));
        runner.enqueue(task).unwrap();
        futures.push((i, fut));
    }

    let report = runner.run_turn();
    assert_eq!(report.completed, 32);
    assert!(runner.is_empty());
    for (i, fut) in futures {
        assert_eq!(fut.wait(), Ok(i * 2));
    }
}

/// Records the turn of every invocation; ready on its third.
struct Alternating {
    turns: Arc<Mutex<Vec<u64>>>,
}

impl Task for Alternating {
    fn name(&self) -> &str {
        "alternating"
    }

    fn run(&mut self, ctx: &TaskContext<'_>) -> RunResult {
        let mut turns = self.turns.lock().unwrap();
        turns.push(ctx.turn());
        if turns.len() == 3 {
            RunResult::Ok
        } else {
            RunResult::Deferred
        }
    }
}

#[test]
fn one_invocation_per_turn_under_concurrent_producers() {
    let runner = Arc::new(TaskRunner::default());
    let turns = Arc::new(Mutex::new(Vec::new()));
    runner
        .enqueue(Alternating {
            turns: Arc::clone(&turns),
        })
        .unwrap();

    thread::scope(|s| {
        for p in 0..4 {
            let runner = Arc::clone(&runner);
            s.spawn(move || {
                for i in 0..200 {
                    let task: TaskBox =
                        Box::new(TaskFn::new(format!("p{p}-{i}"), move || Some(i)));
                    runner.enqueue_boxed(task).unwrap();
                }
            });
        }
        for _ in 0..3 {
            runner.run_turn();
        }
    });

    assert_eq!(*turns.lock().unwrap(), vec![1, 2, 3]);
    assert!(!runner.pending().iter().any(|n| n == "alternating"));

    runner.run_until_idle(Some(10));
    assert!(runner.is_empty());
    assert_eq!(turns.lock().unwrap().len(), 3);
}

#[test]
fn shutdown_rejects_every_queued_task() {
    for k in [0_usize, 1, 5, 20] {
        let runner = TaskRunner::default();
        let futures: Vec<_> = (0..k)
            .map(|i| {
                let (task, fut) = make_named_task(format!("stuck-{i}"), || None::<u8>);
                runner.enqueue(task).unwrap();
                fut
            })
            .collect();
        runner.run_turn();

        assert_eq!(runner.shutdown(), k);
        assert!(runner.is_empty());
        for fut in futures {
            assert_eq!(fut.wait(), Err(TaskError::RunnerShutdown));
        }
    }
}

#[test]
fn task_names_round_trip() {
    let (named, _fut) = make_named_task("fetch-config", || ());
    assert_eq!(named.name(), "fetch-config");

    let (unnamed, _fut) = make_task(|| Some(1_u8));
    let first = unnamed.name().to_string();
    assert!(!first.is_empty());
    assert_eq!(unnamed.name(), first);

    let boxed: TaskBox = Box::new(unnamed);
    assert_eq!(boxed.name(), first);

    let (other, _fut) = make_task(|| Some(2_u8));
    assert_ne!(other.name(), first);
}

#[test]
fn std_and_foreign_payloads_reach_the_future() {
    let runner = TaskRunner::default();

    let (path_task, path_fut) = make_task(|| Some(std::path::PathBuf::from("/tmp")));
    let (array_task, array_fut) = make_task(|| Some([7_u8; 3]));

    let mut polls = 0;
    let (range_task, range_fut) = make_named_task("foreign", move || {
        polls += 1;
        if polls < 2 {
            Outcome::Pending
        } else {
            Outcome::Ready(10..20_u64)
        }
    });

    runner.enqueue(path_task).unwrap();
    runner.enqueue(array_task).unwrap();
    runner.enqueue(range_task).unwrap();
    assert_eq!(runner.run_until_idle(Some(5)), 2);

    assert_eq!(path_fut.wait(), Ok(std::path::PathBuf::from("/tmp")));
    assert_eq!(array_fut.wait(), Ok([7, 7, 7]));
    assert_eq!(range_fut.wait(), Ok(10..20));
}
