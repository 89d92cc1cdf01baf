//! # One-shot result channel between a task and its producer.
//!
//! [`channel`] creates a pair: the [`Promise`] is owned by the task, the [`TaskFuture`] stays with
//! whoever enqueued it. The promise is written once; the future is read once.
//!
//! ## Outcomes seen by the future
//! ```text
//! promise.resolve(v)      → Ok(v)
//! promise.reject(err)     → Err(err)
//! promise dropped         → Err(TaskError::Abandoned)   (broken promise)
//! ```
//!
//! Dropping the future is always allowed; the task keeps running and its later
//! `resolve`/`reject` is silently discarded.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::TaskError;

type Slot<T> = Result<T, TaskError>;

/// Creates a connected promise/future pair.
///
/// ```rust
/// use taskrunner::promise;
///
/// let (promise, mut fut) = promise::channel::<u32>();
/// promise.resolve(7);
/// assert_eq!(fut.try_take(), Some(Ok(7)));
/// ```
pub fn channel<T>() -> (Promise<T>, TaskFuture<T>) {
    let (tx, rx) = oneshot::channel();
    (Promise { tx }, TaskFuture { rx })
}

/// Write side of the channel, owned by a task.
#[derive(Debug)]
pub struct Promise<T> {
    tx: oneshot::Sender<Slot<T>>,
}

impl<T> Promise<T> {
    /// Settles the future with a value.
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Settles the future with an error.
    pub fn reject(self, error: TaskError) {
        let _ = self.tx.send(Err(error));
    }

    /// True once the producer dropped its future; settling is then a no-op.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Read side of the channel, held by the producer.
///
/// Await it from async code, call [`TaskFuture::wait`] from a plain thread, or poll with
/// [`TaskFuture::try_take`].
#[derive(Debug)]
#[must_use = "dropping a TaskFuture discards the task's result"]
pub struct TaskFuture<T> {
    rx: oneshot::Receiver<Slot<T>>,
}

impl<T> TaskFuture<T> {
    /// Blocks the current thread until the task settles.
    ///
    /// # Panics
    /// Panics when called from within an asynchronous execution context; `.await` the future there.
    pub fn wait(self) -> Result<T, TaskError> {
        self.rx.blocking_recv().unwrap_or(Err(TaskError::Abandoned))
    }

    /// Returns the result if the task has settled, `None` while it is still pending.
    ///
    /// Once a result has been taken, further calls report [`TaskError::Abandoned`].
    pub fn try_take(&mut self) -> Option<Result<T, TaskError>> {
        match self.rx.try_recv() {
            Ok(slot) => Some(slot),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(TaskError::Abandoned)),
        }
    }
}

impl<T> Future for TaskFuture<T> {
    type Output = Result<T, TaskError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(TaskError::Abandoned)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_until_settled() {
        let (promise, mut fut) = channel::<&str>();
        assert_eq!(fut.try_take(), None);
        promise.resolve("ok");
        assert_eq!(fut.try_take(), Some(Ok("ok")));
    }

    #[test]
    fn test_reject_carries_error() {
        let (promise, fut) = channel::<u8>();
        promise.reject(TaskError::RunnerShutdown);
        assert_eq!(fut.wait(), Err(TaskError::RunnerShutdown));
    }

    #[test]
    fn test_dropped_promise_is_broken() {
        let (promise, fut) = channel::<u8>();
        drop(promise);
        assert_eq!(fut.wait(), Err(TaskError::Abandoned));
    }

    #[test]
    fn test_dropped_future_marks_promise_abandoned() {
        let (promise, fut) = channel::<u8>();
        assert!(!promise.is_abandoned());
        drop(fut);
        assert!(promise.is_abandoned());
        promise.resolve(1);
    }

    #[tokio::test]
    async fn test_await_across_threads() {
        let (promise, fut) = channel::<u64>();
        std::thread::spawn(move || promise.resolve(42));
        assert_eq!(fut.await, Ok(42));
    }
}
