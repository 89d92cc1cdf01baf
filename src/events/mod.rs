//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the runner, tasks and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `TaskRunner` (queue and turn events), `TaskFn` / `RetryingTask`
//!   through their `TaskContext` (failures, exhausted retries), `SubscriberSet` workers.
//! - **Consumers**: the subscriber listener spawned by `RunnerBuilder::build`, and any raw
//!   receiver obtained from `TaskRunner::subscribe`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
