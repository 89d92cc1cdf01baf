//! # Event subscribers.
//!
//! Hosts observe a runner by implementing [`Subscribe`] and passing the subscribers to
//! [`RunnerBuilder::with_subscribers`](crate::RunnerBuilder::with_subscribers).
//!
//! ```text
//! TaskRunner ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                          ├──► [queue] ─► LogWriter
//!                                                          └──► [queue] ─► custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
