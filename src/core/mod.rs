//! Runtime core: the task queue and the runner that drives it.
//!
//! The public API from this module is [`TaskRunner`] (plus its builder, config and turn report).
//!
//! Internal modules:
//! - [`queue`]: mutex-protected FIFO with a closed flag;
//! - [`runner`]: enqueue, turns, shutdown;
//! - [`worker`]: tokio drive loop paced by the cadence policy;
//! - [`builder`]: wires subscribers to the event bus.

mod builder;
mod config;
mod queue;
mod runner;
mod worker;

pub use builder::RunnerBuilder;
pub use config::RunnerConfig;
pub use runner::{TaskRunner, TurnReport};
