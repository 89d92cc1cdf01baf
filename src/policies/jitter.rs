//! # Jitter policy for pauses between turns.
//!
//! [`JitterPolicy`] randomizes stretched pauses so that several runners polling the same
//! resource do not wake up in lockstep.
//!
//! - [`JitterPolicy::None`]: exact pause, predictable timing
//! - [`JitterPolicy::Full`]: random pause in [0, pause]
//! - [`JitterPolicy::Equal`]: pause/2 + random[0, pause/2]

use rand::Rng;
use std::time::Duration;

/// Policy controlling randomization of pauses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the computed pause.
    #[default]
    None,

    /// Full jitter: random pause in [0, pause].
    Full,

    /// Equal jitter: pause/2 + random[0, pause/2]. Keeps at least half of the pause.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given pause.
    pub fn apply(&self, pause: Duration) -> Duration {
        let ms = pause.as_millis().min(u128::from(u64::MAX)) as u64;
        if ms == 0 {
            return pause;
        }

        let mut rng = rand::rng();
        match self {
            JitterPolicy::None => pause,
            JitterPolicy::Full => Duration::from_millis(rng.random_range(0..=ms)),
            JitterPolicy::Equal => {
                let half = ms / 2;
                Duration::from_millis(half + rng.random_range(0..=half))
            }
        }
    }
}
