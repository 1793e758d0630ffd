//! Deterministic random number generation for the training loop.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Forkable**: Create independent streams for separate concerns
//!   (e.g., one stream per worker)
//!
//! The exploration policy draws a single uniform `[0, 1)` value per
//! decision and both thresholds and rescales it, so the distribution
//! must stay continuous uniform. Replacing the generator means
//! re-deriving the exploration constants together, not independently.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG for self-play and exploration decisions.
///
/// Uses ChaCha8 for speed while maintaining high-quality randomness.
#[derive(Clone, Debug)]
pub struct TrainRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl TrainRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Uniform draw from the continuous `[0, 1)` range.
    pub fn unit_f32(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Random boolean with the given probability of `true`.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability)
    }
}
