use std::sync::Arc;
use std::time::Duration;

use taskrunner::{
    CadencePolicy, EventKind, JitterPolicy, RunnerConfig, TaskError, TaskRunner, make_named_task,
    make_named_task_with_attempts,
};
use tokio_util::sync::CancellationToken;

fn stretching() -> RunnerConfig {
    RunnerConfig::default().with_cadence(CadencePolicy::Stretch {
        first: Duration::from_secs(1),
        max: Duration::from_secs(4),
        factor: 2.0,
        jitter: JitterPolicy::None,
    })
}

#[tokio::test(start_paused = true)]
async fn drive_loop_settles_every_future() {
    let runner = Arc::new(TaskRunner::new(stretching()));
    let token = CancellationToken::new();
    let handle = runner.spawn(token.clone());

    let mut left = 4;
    let (slow, slow_fut) = make_named_task("slow", move || {
        left -= 1;
        (left == 0).then_some("warm")
    });
    let (doomed, doomed_fut) = make_named_task_with_attempts("doomed", 3, || None::<u64>);
    let (failing, failing_fut) =
        make_named_task("failing", || Err::<Option<u8>, _>("disk full"));

    runner.enqueue(slow).unwrap();
    runner.enqueue(doomed).unwrap();
    runner.enqueue(failing).unwrap();

    assert_eq!(slow_fut.await, Ok("warm"));
    assert_eq!(
        doomed_fut.await,
        Err(TaskError::RetriesExhausted { attempts: 3 })
    );
    assert!(matches!(failing_fut.await, Err(TaskError::Failed { .. })));

    token.cancel();
    handle.await.unwrap();
    assert!(runner.is_closed());
}

#[tokio::test(start_paused = true)]
async fn stalled_turns_stretch_the_pause() {
    let runner = Arc::new(TaskRunner::new(stretching()));
    let mut rx = runner.subscribe();
    let token = CancellationToken::new();
    let handle = runner.spawn(token.clone());

    let (task, fut) = make_named_task("never", || None::<u8>);
    runner.enqueue(task).unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    token.cancel();
    handle.await.unwrap();
    assert_eq!(fut.await, Err(TaskError::RunnerShutdown));

    let mut delays = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::TurnScheduled {
            delays.extend(ev.delay_ms);
        }
    }
    assert!(delays.len() >= 4, "{delays:?}");
    assert_eq!(&delays[..4], &[2000, 4000, 4000, 4000]);
}
