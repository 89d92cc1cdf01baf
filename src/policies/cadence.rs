//! # Cadence of the drive loop.
//!
//! [`CadencePolicy`] decides how long the drive loop pauses between two turns while tasks are
//! still queued. An empty queue never costs a pause: the loop sleeps until the next enqueue.
//!
//! `stalled` is the number of consecutive turns that completed no task. It resets to zero as
//! soon as a turn removes something from the queue.
//!
//! ```text
//! Immediate            → 0                      (yield, then run the next turn)
//! Fixed { interval }   → interval
//! Stretch { .. }       → first × factor^stalled, capped at max, then jitter
//! ```
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskrunner::{CadencePolicy, JitterPolicy};
//!
//! let cadence = CadencePolicy::Stretch {
//!     first: Duration::from_millis(10),
//!     max: Duration::from_millis(100),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(cadence.delay(0), Duration::from_millis(10));
//! assert_eq!(cadence.delay(2), Duration::from_millis(40));
//! assert_eq!(cadence.delay(9), Duration::from_millis(100));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Pause between turns while the queue is non-empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CadencePolicy {
    /// Run the next turn right away (the loop still yields to the scheduler).
    Immediate,
    /// Constant pause.
    Fixed {
        /// Pause between turns.
        interval: Duration,
    },
    /// Pause grows while turns make no progress.
    Stretch {
        /// Pause after a turn that completed something.
        first: Duration,
        /// Upper bound for the pause.
        max: Duration,
        /// Multiplicative growth per stalled turn (`>= 1.0` recommended).
        factor: f64,
        /// Randomization applied to the capped pause.
        jitter: JitterPolicy,
    },
}

impl Default for CadencePolicy {
    /// Returns `Fixed { interval: 10ms }`.
    fn default() -> Self {
        CadencePolicy::Fixed {
            interval: Duration::from_millis(10),
        }
    }
}

impl CadencePolicy {
    /// Computes the pause after a turn, given how many turns in a row completed nothing.
    pub fn delay(&self, stalled: u32) -> Duration {
        match *self {
            CadencePolicy::Immediate => Duration::ZERO,
            CadencePolicy::Fixed { interval } => interval,
            CadencePolicy::Stretch {
                first,
                max,
                factor,
                jitter,
            } => {
                let exp = stalled.min(i32::MAX as u32) as i32;
                let secs = first.as_secs_f64() * factor.powi(exp);
                let base = if !secs.is_finite() || secs < 0.0 || secs > max.as_secs_f64() {
                    max
                } else {
                    Duration::from_secs_f64(secs)
                };
                jitter.apply(base)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stretch(factor: f64) -> CadencePolicy {
        CadencePolicy::Stretch {
            first: Duration::from_millis(5),
            max: Duration::from_millis(80),
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn test_immediate_never_pauses() {
        assert_eq!(CadencePolicy::Immediate.delay(0), Duration::ZERO);
        assert_eq!(CadencePolicy::Immediate.delay(50), Duration::ZERO);
    }

    #[test]
    fn test_fixed_ignores_stalls() {
        let cadence = CadencePolicy::Fixed {
            interval: Duration::from_millis(3),
        };
        for stalled in 0..10 {
            assert_eq!(cadence.delay(stalled), Duration::from_millis(3));
        }
    }

    #[test]
    fn test_stretch_grows_until_cap() {
        let cadence = stretch(2.0);
        assert_eq!(cadence.delay(0), Duration::from_millis(5));
        assert_eq!(cadence.delay(1), Duration::from_millis(10));
        assert_eq!(cadence.delay(3), Duration::from_millis(40));
        assert_eq!(cadence.delay(4), Duration::from_millis(80));
        assert_eq!(cadence.delay(5), Duration::from_millis(80));
    }

    #[test]
    fn test_stretch_overflow_clamps_to_max() {
        assert_eq!(stretch(2.0).delay(u32::MAX), Duration::from_millis(80));
    }

    #[test]
    fn test_stretch_first_above_max() {
        let cadence = CadencePolicy::Stretch {
            first: Duration::from_secs(1),
            max: Duration::from_millis(200),
            factor: 1.0,
            jitter: JitterPolicy::None,
        };
        assert_eq!(cadence.delay(0), Duration::from_millis(200));
    }
}
