use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio_util::sync::CancellationToken;

use crate::core::{config::RunnerConfig, runner::TaskRunner};
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for a [`TaskRunner`] with subscribers attached.
pub struct RunnerBuilder {
    cfg: RunnerConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RunnerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RunnerConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive runtime events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the runner.
    ///
    /// With subscribers, spawns a listener that forwards bus events to them until the runner
    /// has shut down, then flushes their queues.
    ///
    /// # Panics
    /// Panics if subscribers were given and no tokio runtime is active.
    pub fn build(self) -> Arc<TaskRunner> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let runner = Arc::new(TaskRunner::with_bus(self.cfg, bus.clone()));

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(bus, set, runner.stopped.clone());
        }
        runner
    }
}

/// Forwards bus events to the subscriber set until `stopped`, draining what is left afterwards.
fn subscriber_listener(bus: Bus, set: SubscriberSet, stopped: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = stopped.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(ev) => set.emit(&ev),
                            Err(TryRecvError::Lagged(_)) => continue,
                            Err(_) => break,
                        }
                    }
                    break;
                }
            }
        }
        set.shutdown().await;
    });
}
