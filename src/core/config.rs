//! # Runner configuration.
//!
//! Provides [`RunnerConfig`], the settings of a [`TaskRunner`](crate::TaskRunner).
//!
//! Config is used in two ways:
//! 1. **Plain runner**: `TaskRunner::new(config)`
//! 2. **With subscribers**: `TaskRunner::builder(config).with_subscribers(..).build()`
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1

use crate::policies::CadencePolicy;

/// Configuration of a task runner.
///
/// ## Field semantics
/// - `cadence`: pause between turns while tasks remain queued (only used by the drive loop;
///   hosts pumping `run_turn` themselves choose their own cadence)
/// - `bus_capacity`: event bus ring buffer size (min 1)
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Pause between turns while tasks remain queued.
    pub cadence: CadencePolicy,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events skip older items.
    pub bus_capacity: usize,
}

impl RunnerConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a copy with the given cadence.
    pub fn with_cadence(mut self, cadence: CadencePolicy) -> Self {
        self.cadence = cadence;
        self
    }
}

impl Default for RunnerConfig {
    /// Default configuration:
    ///
    /// - `cadence = CadencePolicy::default()` (fixed 10ms)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            cadence: CadencePolicy::default(),
            bus_capacity: 1024,
        }
    }
}
