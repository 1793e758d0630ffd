//! Periodic application of weight updates.
//!
//! The learning passes only accumulate gradients; this scheduler
//! decides when the model commits them. Two tick counters advance once
//! per completed game: gradient commits land every 10th game, and a
//! much rarer weight-decay pass counters unbounded weight growth every
//! 10 000th game at a rate three orders of magnitude below the
//! learning rate. Both counters wrap at 10 000 and never overflow.

use crate::model::Model;

/// Per-game tick counters driving gradient commits and weight decay.
#[derive(Clone, Copy, Debug, Default)]
pub struct LearnSchedule {
    commit_tick: u32,
    decay_tick: u32,
}

impl LearnSchedule {
    /// Games between gradient commits.
    pub const COMMIT_INTERVAL: u32 = 10;

    /// Games between weight-decay passes; also the wrap point of both
    /// counters.
    pub const DECAY_INTERVAL: u32 = 10_000;

    /// Decay rate as a fraction of the learning rate.
    pub const DECAY_RATE_SCALE: f32 = 1e-3;

    /// Create a schedule with both counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance both counters for one completed game, committing
    /// gradients and applying decay when their ticks come up.
    pub fn game_finished(&mut self, model: &mut dyn Model, learn_rate: f32) {
        self.commit_tick += 1;
        if self.commit_tick >= Self::DECAY_INTERVAL {
            self.commit_tick = 0;
        }
        if self.commit_tick % Self::COMMIT_INTERVAL == Self::COMMIT_INTERVAL - 1 {
            model.learn(learn_rate);
        }

        self.decay_tick += 1;
        if self.decay_tick >= Self::DECAY_INTERVAL {
            self.decay_tick = 0;
        }
        if self.decay_tick == Self::DECAY_INTERVAL - 1 {
            model.normalize(learn_rate * Self::DECAY_RATE_SCALE);
        }
    }
}
