//! Drive-loop pacing policies.
//!
//! This module groups the knobs that control **how long** the drive loop waits between turns
//! while tasks are still pending.
//!
//! ## Contents
//! - [`CadencePolicy`] pause between turns (immediate / fixed / stretching while stalled)
//! - [`JitterPolicy`]  randomization applied to stretched pauses
//!
//! ## Quick wiring
//! ```text
//! RunnerConfig { cadence: CadencePolicy, .. }
//!      └─► TaskRunner::drive uses cadence.delay(stalled_turns) after every turn
//! ```
//!
//! ## Defaults
//! - `CadencePolicy::Fixed { interval: 10ms }`.
//! - `JitterPolicy::None`.

mod cadence;
mod jitter;

pub use cadence::CadencePolicy;
pub use jitter::JitterPolicy;
