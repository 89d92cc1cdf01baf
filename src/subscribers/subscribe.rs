//! # Subscriber trait for runtime events.
//!
//! `Subscribe` is how hosts observe a [`TaskRunner`](crate::TaskRunner): every event published on
//! the bus is handed to each subscriber through its own bounded queue, owned by the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they never block the runner nor other subscribers.
//! - Each subscriber declares its queue capacity via [`Subscribe::queue_capacity`]. On overflow
//!   the event is dropped for that subscriber and `SubscriberOverflow` is published.
//!
//! ## Example
//! ```rust
//! use taskrunner::{Event, EventKind, Subscribe};
//!
//! struct Failures;
//!
//! #[async_trait::async_trait]
//! impl Subscribe for Failures {
//!     async fn on_event(&self, ev: &Event) {
//!         if ev.kind == EventKind::TaskFailed {
//!             // page someone
//!         }
//!     }
//!     fn name(&self) -> &'static str { "failures" }
//!     fn queue_capacity(&self) -> usize { 64 }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event subscribers.
///
/// Called from a dedicated worker task; avoid blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handles a single event.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow/panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
